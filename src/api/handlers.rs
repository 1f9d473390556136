//! API Handlers
//!
//! HTTP request handlers standing in for the file-transfer protocol layer.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::config::Config;
use crate::error::{Result, VfsError};
use crate::key::KeyGenerator;
use crate::models::{HealthResponse, PutDataRequest, PutDataResponse, ReadQuery, StatsResponse};
use crate::producer::{ContentProducer, FileDriver};
use crate::storage::{MemoryDataStore, TemplateStore};
use crate::vfs::FileStat;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<TemplateStore>,
    pub data: Arc<MemoryDataStore>,
    pub keys: Arc<KeyGenerator>,
    pub producer: ContentProducer,
}

impl AppState {
    /// Wires the producer to the given stores and key generator.
    pub fn new(
        templates: Arc<TemplateStore>,
        data: Arc<MemoryDataStore>,
        keys: Arc<KeyGenerator>,
    ) -> Result<Self> {
        let producer = ContentProducer::builder()
            .templates(templates.clone())
            .data(data.clone())
            .keys(keys.clone())
            .build()?;

        Ok(Self {
            templates,
            data,
            keys,
            producer,
        })
    }

    /// Builds stores and key generator from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let templates = Arc::new(TemplateStore::from_config(config)?);
        let data = Arc::new(MemoryDataStore::from_config(config));
        let keys = Arc::new(KeyGenerator::new(config.keys.clone())?);
        Self::new(templates, data, keys)
    }
}

/// Handler for PUT /data
///
/// Stores a payload under a fresh key, or under the supplied key if it
/// matches the key pattern exactly.
pub async fn put_data_handler(
    State(state): State<AppState>,
    Json(req): Json<PutDataRequest>,
) -> Result<Json<PutDataResponse>> {
    let key = match req.key {
        Some(key) => {
            if state.keys.validate(&key)? != key {
                return Err(VfsError::KeyNotFound);
            }
            key
        }
        None => state.keys.new_key(),
    };

    let ttl = match req.ttl {
        Some(secs) => Duration::from_secs(secs),
        None => state.data.default_ttl().await,
    };
    state.data.put(key.clone(), req.payload, Some(ttl)).await?;

    Ok(Json(PutDataResponse::new(key, ttl.as_secs())))
}

/// Handler for GET /stat/*path
pub async fn stat_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<FileStat>> {
    Ok(Json(state.producer.stat(&path).await?))
}

/// Handler for GET /files/*path?offset=N
///
/// Streams the rendered file from the requested offset.
pub async fn read_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Response> {
    let (remaining, reader) = state.producer.read(&path, query.offset.unwrap_or(0)).await?;

    let last_modified = reader
        .modified()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type(&path).to_string()),
            (header::CONTENT_LENGTH, remaining.to_string()),
            (header::LAST_MODIFIED, last_modified),
        ],
        reader.into_remaining(),
    )
        .into_response())
}

fn content_type(path: &str) -> &'static str {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        "text/html; charset=utf-8"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Handler for PUT /files/*path
pub async fn put_file_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<StatusCode> {
    state.producer.put_file(&path, &body, false).await?;
    Ok(StatusCode::CREATED)
}

/// Handler for DELETE /files/*path
pub async fn delete_file_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<StatusCode> {
    state.producer.delete_file(&path).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /dirs/*path
pub async fn list_dir_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<Vec<FileStat>>> {
    Ok(Json(state.producer.list_dir(&path).await?))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.templates.stats().await,
        state.data.stats().await,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyConfig;
    use serde_json::json;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(86_400);
    const KEY: &str = "0123456789abcdefghijABCDEFGHIJ01";

    fn test_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("default.tmpl"), "{{.Caption}}").unwrap();
        let templates = Arc::new(TemplateStore::new(dir.path(), DAY, 100).unwrap());
        let data = Arc::new(MemoryDataStore::new(DAY, 100));
        let keys = Arc::new(KeyGenerator::new(KeyConfig::default()).unwrap());
        let state = AppState::new(templates, data, keys).unwrap();
        (dir, state)
    }

    #[tokio::test]
    async fn test_put_data_generates_key() {
        let (_dir, state) = test_state();

        let req = PutDataRequest {
            payload: json!({"Caption": "hi"}),
            ttl: None,
            key: None,
        };
        let response = put_data_handler(State(state.clone()), Json(req)).await.unwrap();

        assert_eq!(state.keys.validate(&response.key).unwrap(), response.key);
        assert_eq!(response.ttl, DAY.as_secs());
        assert!(state.data.get(&response.key).await.is_ok());
    }

    #[tokio::test]
    async fn test_put_data_rejects_foreign_key() {
        let (_dir, state) = test_state();

        for key in ["not-a-key".to_string(), format!("x{}", KEY)] {
            let req = PutDataRequest {
                payload: json!({}),
                ttl: Some(60),
                key: Some(key.clone()),
            };
            let result = put_data_handler(State(state.clone()), Json(req)).await;
            assert!(matches!(result, Err(VfsError::KeyNotFound)), "{}", key);
        }
    }

    #[tokio::test]
    async fn test_stat_after_put() {
        let (_dir, state) = test_state();
        state
            .data
            .put(KEY, json!({"Caption": "hi"}), None)
            .await
            .unwrap();

        let stat = stat_handler(State(state), Path(format!("{}.html", KEY)))
            .await
            .unwrap();
        assert_eq!(stat.size, 2);
    }

    #[tokio::test]
    async fn test_unsupported_handlers() {
        let (_dir, state) = test_state();

        let deleted = delete_file_handler(State(state.clone()), Path("x".to_string())).await;
        assert_eq!(deleted, Err(VfsError::Unsupported));

        let listed = list_dir_handler(State(state), Path("x".to_string())).await;
        assert!(matches!(listed, Err(VfsError::Unsupported)));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("a/K.HTML"), "text/html; charset=utf-8");
        assert_eq!(content_type("K.txt"), "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}

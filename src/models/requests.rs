//! Request DTOs for the HTTP gateway
//!
//! Defines the structure of incoming HTTP request bodies and queries.

use serde::Deserialize;
use serde_json::Value;

/// Request body for storing a data record (PUT /data)
///
/// # Fields
/// - `payload`: Arbitrary JSON the templates are rendered against
/// - `ttl`: Optional TTL in seconds (uses the store default if not specified)
/// - `key`: Optional key; a fresh one is generated when absent
#[derive(Debug, Clone, Deserialize)]
pub struct PutDataRequest {
    pub payload: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
    #[serde(default)]
    pub key: Option<String>,
}

/// Query of a file read (GET /files/*path?offset=N)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadQuery {
    /// Byte offset to start reading from
    #[serde(default)]
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_data_request_deserialize() {
        let json = r#"{"payload": {"Caption": "hi"}}"#;
        let req: PutDataRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.payload["Caption"], "hi");
        assert!(req.ttl.is_none());
        assert!(req.key.is_none());
    }

    #[test]
    fn test_put_data_request_with_ttl_and_key() {
        let json = r#"{"payload": null, "ttl": 60, "key": "abc"}"#;
        let req: PutDataRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(60));
        assert_eq!(req.key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_read_query_negative_offset() {
        let query: ReadQuery = serde_json::from_str(r#"{"offset": -5}"#).unwrap();
        assert_eq!(query.offset, Some(-5));
    }
}

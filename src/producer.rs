//! Content Producer
//!
//! Resolves a path into a template id and a data key, renders the template
//! with the record's payload and serves the result as a read-only file.
//!
//! A path is `<dir>/<dir>/.../<file>`: the directories form the template id
//! and the file name must contain a key. `example/redirect/abc.html` renders
//! template `example/redirect` with the record stored under `abc`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{Result, VfsError};
use crate::key::KeyGenerator;
use crate::storage::{DataSource, TemplateSource};
use crate::vfs::{FileReader, FileStat, VirtualFile};

// == File Driver ==
/// Operations the protocol layer invokes on the virtual tree.
///
/// Only `stat` and `read` are served; everything that would list or
/// mutate the tree fails with `Unsupported`.
#[async_trait]
pub trait FileDriver: Send + Sync {
    /// Metadata of the file at `path`.
    async fn stat(&self, path: &str) -> Result<FileStat>;

    /// Content of the file at `path` from `offset`, with the number of bytes left.
    async fn read(&self, path: &str, offset: i64) -> Result<(u64, FileReader)>;

    async fn list_dir(&self, _path: &str) -> Result<Vec<FileStat>> {
        Err(VfsError::Unsupported)
    }

    async fn delete_dir(&self, _path: &str) -> Result<()> {
        Err(VfsError::Unsupported)
    }

    async fn delete_file(&self, _path: &str) -> Result<()> {
        Err(VfsError::Unsupported)
    }

    async fn rename(&self, _from: &str, _to: &str) -> Result<()> {
        Err(VfsError::Unsupported)
    }

    async fn make_dir(&self, _path: &str) -> Result<()> {
        Err(VfsError::Unsupported)
    }

    async fn put_file(&self, _path: &str, _content: &[u8], _append: bool) -> Result<u64> {
        Err(VfsError::Unsupported)
    }
}

// == Content Producer ==
/// Stateless composition of the template source, data source and key validator.
#[derive(Clone)]
pub struct ContentProducer {
    templates: Arc<dyn TemplateSource>,
    data: Arc<dyn DataSource>,
    keys: Arc<KeyGenerator>,
}

impl ContentProducer {
    pub fn new(
        templates: Arc<dyn TemplateSource>,
        data: Arc<dyn DataSource>,
        keys: Arc<KeyGenerator>,
    ) -> Self {
        Self {
            templates,
            data,
            keys,
        }
    }

    pub fn builder() -> ProducerBuilder {
        ProducerBuilder::default()
    }

    // == Parse Path ==
    /// Splits `path` into the data key and the template id.
    ///
    /// A leading `.` or `..` segment is dropped; on its own it is a wrong
    /// path, as is an empty file name or one without a key.
    pub fn parse_path(&self, path: &str) -> Result<(String, String)> {
        let mut segments: Vec<&str> = path.split('/').collect();

        if matches!(segments.first(), Some(&".") | Some(&"..")) {
            if segments.len() == 1 {
                return Err(VfsError::InvalidPath);
            }
            segments.remove(0);
        }

        let (filename, dirs) = segments.split_last().ok_or(VfsError::InvalidPath)?;
        if filename.is_empty() {
            return Err(VfsError::InvalidPath);
        }

        let key = self
            .keys
            .validate(filename)
            .map_err(|_| VfsError::InvalidPath)?;

        let template_id = dirs
            .iter()
            .filter(|s| !s.is_empty() && **s != ".")
            .copied()
            .collect::<Vec<_>>()
            .join("/");

        Ok((key, template_id))
    }

    // == Produce ==
    /// Renders the file at `path`.
    ///
    /// Store errors pass through unchanged. The file's modification time is
    /// the record's creation time.
    pub async fn produce(&self, path: &str) -> Result<VirtualFile> {
        let (key, template_id) = self.parse_path(path)?;

        let template = self.templates.template(&template_id).await?;
        let record = self.data.get(&key).await?;

        let body = template.render(&record.payload)?;

        Ok(VirtualFile::new(path, body.into_bytes(), record.created_at))
    }
}

#[async_trait]
impl FileDriver for ContentProducer {
    /// A path without a key answers with an empty directory-like entry:
    /// clients probe every intermediate directory before fetching the file.
    async fn stat(&self, path: &str) -> Result<FileStat> {
        match self.produce(path).await {
            Ok(file) => Ok(file.stat()),
            Err(VfsError::InvalidPath) => Ok(VirtualFile::probe(path).stat()),
            Err(e) => {
                warn!("STAT {} {}", path, e);
                Err(VfsError::Unavailable)
            }
        }
    }

    async fn read(&self, path: &str, offset: i64) -> Result<(u64, FileReader)> {
        let file = self.produce(path).await.map_err(|e| {
            warn!("GET {} {}", path, e);
            VfsError::Unavailable
        })?;

        let length = file.size();
        let offset = u64::try_from(offset).map_err(|_| VfsError::EndOfData)?;
        if offset > length {
            return Err(VfsError::EndOfData);
        }

        info!("GET {}", path);
        Ok((length - offset, FileReader::new(file, offset)))
    }
}

// == Producer Builder ==
/// Collects the producer's dependencies; `build` fails if one is missing.
#[derive(Default)]
pub struct ProducerBuilder {
    templates: Option<Arc<dyn TemplateSource>>,
    data: Option<Arc<dyn DataSource>>,
    keys: Option<Arc<KeyGenerator>>,
}

impl ProducerBuilder {
    pub fn templates(mut self, templates: Arc<dyn TemplateSource>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn data(mut self, data: Arc<dyn DataSource>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn keys(mut self, keys: Arc<KeyGenerator>) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn build(self) -> Result<ContentProducer> {
        let templates = self
            .templates
            .ok_or_else(|| VfsError::Config("template source isn't defined".to_string()))?;
        let data = self
            .data
            .ok_or_else(|| VfsError::Config("data source isn't defined".to_string()))?;
        let keys = self
            .keys
            .ok_or_else(|| VfsError::Config("key validator isn't defined".to_string()))?;

        Ok(ContentProducer::new(templates, data, keys))
    }
}

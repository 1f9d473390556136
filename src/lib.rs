//! Template VFS - read-only virtual files rendered on demand
//!
//! A path such as `example/redirect/<key>.html` is split into a template id
//! (`example/redirect`) and a data key. The template and the data record
//! come from their own TTL caches and are rendered into a virtual file whose
//! modification time is the record's creation time.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod models;
pub mod producer;
pub mod storage;
pub mod tasks;
pub mod template;
pub mod vfs;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, VfsError};
pub use key::{KeyConfig, KeyGenerator};
pub use producer::{ContentProducer, FileDriver};
pub use storage::{DataSource, MemoryDataStore, TemplateSource, TemplateStore};
pub use tasks::{spawn_sweep_task, SweepHandle};
pub use vfs::{FileReader, FileStat, VirtualFile};

use ag_core::config::HistoryConfig;
use ag_core::{Error, HistoryStorage, Result};
use std::str::FromStr;
use std::sync::Arc;

pub mod analytics;
pub mod backends;

pub use analytics::summarize;
pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    File,
    Memory,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!("unknown storage backend: {}", other))),
        }
    }
}

pub fn create_storage(kind: StorageKind, config: &HistoryConfig) -> Arc<dyn HistoryStorage> {
    match kind {
        StorageKind::File => Arc::new(JsonFileStorage::new(config)),
        StorageKind::Memory => Arc::new(InMemoryStorage::new(config.cap)),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, summarize, StorageKind};
}

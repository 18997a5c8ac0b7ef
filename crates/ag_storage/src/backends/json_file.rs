use ag_core::config::HistoryConfig;
use ag_core::{Error, GeneratedArticle, HistoryLog, HistoryStorage, PipelineResult, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::prepend_capped;

/// History log kept as one pretty-printed JSON array on disk.
///
/// Every append rewrites the whole file, which stays cheap because the log is
/// capped. Writes land in a sibling `.tmp` file that is renamed over the log,
/// so readers only ever see a complete document. A failed write or rename
/// removes the temporary file. The mutex serialises the
/// read-modify-write cycle inside this process.
pub struct JsonFileStorage {
    path: PathBuf,
    cap: usize,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(config: &HistoryConfig) -> Self {
        Self::with_path(config.path.clone(), config.cap)
    }

    pub fn with_path(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HistoryLog> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, log: &HistoryLog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(log)?;
        let tmp = PathBuf::from(format!("{}.tmp", self.path.display()));
        let written = match fs::write(&tmp, json).await {
            Ok(()) => fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryStorage for JsonFileStorage {
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn append(&self, article: GeneratedArticle) -> Result<PipelineResult> {
        let _guard = self.write_lock.lock().await;

        let mut log = self.load().await.map_err(|e| {
            debug!(error = %e, "Error reading history before append");
            Error::PersistenceFailed(e.to_string())
        })?;

        let entry = PipelineResult::from_article(article, Utc::now());
        prepend_capped(&mut log, entry.clone(), self.cap);

        self.store(&log).await.map_err(|e| {
            debug!(error = %e, "Error saving to history");
            Error::PersistenceFailed(e.to_string())
        })?;

        debug!(entries = log.len(), "History updated");
        Ok(entry)
    }

    async fn read_all(&self) -> Result<HistoryLog> {
        match self.load().await {
            Ok(log) => Ok(log),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Error reading history; serving empty log");
                Ok(Vec::new())
            }
        }
    }
}

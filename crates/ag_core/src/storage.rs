use async_trait::async_trait;
use crate::types::{GeneratedArticle, HistoryLog, PipelineResult};
use crate::Result;

#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Stamp an article, prepend it to the log and truncate the log to its cap.
    async fn append(&self, article: GeneratedArticle) -> Result<PipelineResult>;

    /// The full log, newest first. An absent store is an empty log.
    async fn read_all(&self) -> Result<HistoryLog>;
}

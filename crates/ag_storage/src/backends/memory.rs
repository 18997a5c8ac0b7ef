use ag_core::{GeneratedArticle, HistoryLog, HistoryStorage, PipelineResult, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::prepend_capped;

/// Process-local history log, lost on exit.
pub struct InMemoryStorage {
    log: RwLock<HistoryLog>,
    cap: usize,
}

impl InMemoryStorage {
    pub fn new(cap: usize) -> Self {
        Self {
            log: RwLock::new(Vec::new()),
            cap,
        }
    }
}

#[async_trait]
impl HistoryStorage for InMemoryStorage {
    async fn append(&self, article: GeneratedArticle) -> Result<PipelineResult> {
        let entry = PipelineResult::from_article(article, Utc::now());
        let mut log = self.log.write().await;
        prepend_capped(&mut log, entry.clone(), self.cap);
        Ok(entry)
    }

    async fn read_all(&self) -> Result<HistoryLog> {
        Ok(self.log.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = InMemoryStorage::new(2);
        assert!(storage.read_all().await.unwrap().is_empty());

        for url in ["http://a.test", "http://b.test", "http://c.test"] {
            storage
                .append(GeneratedArticle {
                    url: url.to_string(),
                    keywords: vec!["node".to_string()],
                    generated_content: "This is a test article about politics.".to_string(),
                })
                .await
                .unwrap();
        }

        let log = storage.read_all().await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].url, "http://c.test");
        assert_eq!(log[1].url, "http://b.test");
        assert_eq!(log[0].metadata.word_count, 7);
    }
}

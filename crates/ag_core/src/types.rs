use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An article produced by a pipeline run that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArticle {
    pub url: String,
    pub keywords: Vec<String>,
    pub generated_content: String,
}

/// One entry of the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub url: String,
    pub keywords: Vec<String>,
    pub generated_content: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: ResultMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub word_count: usize,
    pub keyword_count: usize,
}

impl ResultMetadata {
    pub fn derive(generated_content: &str, keywords: &[String]) -> Self {
        Self {
            word_count: generated_content.split_whitespace().count(),
            keyword_count: keywords.len(),
        }
    }
}

impl PipelineResult {
    /// Stamps an article; metadata is always derived, never taken from the caller.
    pub fn from_article(article: GeneratedArticle, timestamp: DateTime<Utc>) -> Self {
        let metadata = ResultMetadata::derive(&article.generated_content, &article.keywords);
        Self {
            url: article.url,
            keywords: article.keywords,
            generated_content: article.generated_content,
            timestamp,
            metadata,
        }
    }

    /// `YYYY-MM-DD` portion of the timestamp, the analytics timeline bucket.
    pub fn date(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Newest-first sequence of pipeline results.
pub type HistoryLog = Vec<PipelineResult>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineBucket {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Aggregate statistics over the whole history log. Never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_generations: usize,
    pub keywords: std::collections::BTreeMap<String, usize>,
    pub popular_keywords: Vec<KeywordCount>,
    pub timeline: Vec<TimelineBucket>,
    pub average_word_count: f64,
    pub average_keywords: f64,
}

pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, ErrorKind, Result};
pub use models::GenerationModel;
pub use storage::HistoryStorage;
pub use types::{
    AnalyticsSnapshot, GeneratedArticle, HistoryLog, KeywordCount, PipelineResult, ResultMetadata,
    TimelineBucket,
};

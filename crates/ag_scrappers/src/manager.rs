use std::sync::Arc;

use ag_core::{
    AppConfig, Error, ErrorKind, GeneratedArticle, GenerationModel, HistoryStorage, PipelineResult,
    Result,
};
use ag_inference::{build_prompt, create_model, KeywordExtractor};
use tracing::{error, info, instrument, warn};

use crate::fetcher::Fetcher;

/// Runs fetch, keyword extraction, generation and persistence for one URL
/// at a time. Concurrency across runs is up to the caller; the only shared
/// mutable state is the history storage.
pub struct PipelineManager {
    fetcher: Fetcher,
    extractor: KeywordExtractor,
    model: Arc<dyn GenerationModel>,
    storage: Arc<dyn HistoryStorage>,
}

impl PipelineManager {
    pub fn new(
        fetcher: Fetcher,
        extractor: KeywordExtractor,
        model: Arc<dyn GenerationModel>,
        storage: Arc<dyn HistoryStorage>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            model,
            storage,
        }
    }

    pub fn from_config(config: &AppConfig, storage: Arc<dyn HistoryStorage>) -> Result<Self> {
        Ok(Self::new(
            Fetcher::new(&config.fetch)?,
            KeywordExtractor::new(&config.keywords),
            create_model(&config.generation)?,
            storage,
        ))
    }

    pub fn storage(&self) -> Arc<dyn HistoryStorage> {
        self.storage.clone()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// One pipeline run. Nothing is persisted unless every stage succeeds.
    #[instrument(level = "info", skip(self), fields(model = %self.model.name()))]
    pub async fn run(&self, url: &str) -> Result<PipelineResult> {
        match self.run_stages(url).await {
            Ok(result) => {
                info!(
                    keywords = result.metadata.keyword_count,
                    words = result.metadata.word_count,
                    "Pipeline run complete"
                );
                Ok(result)
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::GenerationFailed
                    | ErrorKind::PersistenceFailed
                    | ErrorKind::ExtractionFailed
                    | ErrorKind::Unexpected => {
                        error!(kind = ?e.kind(), error = %e, "Pipeline run failed")
                    }
                    _ => warn!(kind = ?e.kind(), error = %e, "Pipeline run rejected"),
                }
                Err(e)
            }
        }
    }

    async fn run_stages(&self, url: &str) -> Result<PipelineResult> {
        let url = url.trim();

        let text = self.fetcher.fetch(url).await?.ok_or(Error::NoContentFound)?;

        let keywords = self.extractor.extract(&text)?;
        if keywords.is_empty() {
            return Err(Error::NoKeywordsFound);
        }
        info!(?keywords, "Extracted keywords");

        let prompt = build_prompt(&keywords);
        let generated_content = self.model.generate(&prompt).await?;

        self.storage
            .append(GeneratedArticle {
                url: url.to_string(),
                keywords,
                generated_content,
            })
            .await
    }
}

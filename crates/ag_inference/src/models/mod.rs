use std::sync::Arc;

use ag_core::config::{GenerationConfig, ModelProvider};
use ag_core::{GenerationModel, Result};

pub mod dummy;
pub mod gemini;
pub mod openai;
pub mod retry;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;
pub use openai::OpenAiModel;
pub use retry::RetryingModel;

/// Build the configured provider, wrapped in the configured retry policy.
pub fn create_model(config: &GenerationConfig) -> Result<Arc<dyn GenerationModel>> {
    let inner: Arc<dyn GenerationModel> = match config.provider {
        ModelProvider::Gemini => Arc::new(GeminiModel::new(config)?),
        ModelProvider::OpenAi => Arc::new(OpenAiModel::new(config)?),
        ModelProvider::Dummy => Arc::new(DummyModel::new()),
    };
    Ok(Arc::new(RetryingModel::new(
        inner,
        config.max_attempts,
        config.retry_delay,
    )))
}

use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait GenerationModel: Send + Sync {
    /// Provider name, used in logs
    fn name(&self) -> &str;

    /// Send a prompt to the text-generation service and return its answer.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

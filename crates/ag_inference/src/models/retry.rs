use ag_core::{Error, GenerationModel, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Wraps a [`GenerationModel`] with a bounded, fixed-delay retry.
///
/// Attempts run one after another; a blank answer counts as a failed
/// attempt. The first non-blank answer is returned as is (trimmed) and no
/// further call is made.
pub struct RetryingModel {
    inner: Arc<dyn GenerationModel>,
    max_attempts: usize,
    delay: Duration,
}

impl RetryingModel {
    pub fn new(inner: Arc<dyn GenerationModel>, max_attempts: usize, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts,
            delay,
        }
    }
}

impl fmt::Debug for RetryingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingModel")
            .field("inner", &self.inner.name())
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish()
    }
}

#[async_trait]
impl GenerationModel for RetryingModel {
    fn name(&self) -> &str {
        self.inner.name()
    }

    #[instrument(level = "info", skip_all, fields(model = self.inner.name()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let total_t0 = Instant::now();

        for attempt in 1..=self.max_attempts {
            let attempt_t0 = Instant::now();
            let failure = match self.inner.generate(prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!(
                        attempt,
                        elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                        "Generation succeeded"
                    );
                    return Ok(text.trim().to_string());
                }
                Ok(_) => "empty response".to_string(),
                Err(e) => e.to_string(),
            };

            if attempt == self.max_attempts {
                error!(
                    attempt,
                    max = self.max_attempts,
                    elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                    error = %failure,
                    "Content generation error after retries"
                );
                return Err(Error::GenerationFailed(failure));
            }

            warn!(
                attempt,
                max = self.max_attempts,
                elapsed_ms_attempt = attempt_t0.elapsed().as_millis() as u64,
                delay = ?self.delay,
                error = %failure,
                "Generation attempt failed; retrying"
            );
            sleep(self.delay).await;
        }

        Err(Error::GenerationFailed("no attempts allowed".to_string()))
    }
}

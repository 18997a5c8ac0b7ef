use ag_core::{GenerationModel, Result};
use std::fmt;

use crate::prompt::keywords_from_prompt;

/// Offline model: writes a short templated article around the prompt's keywords.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GenerationModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let keywords = keywords_from_prompt(prompt);
        if keywords.is_empty() {
            return Ok(String::new());
        }

        let mut paragraphs = vec![format!(
            "This article looks at {} and how they relate to one another.",
            keywords.join(", ")
        )];
        for keyword in &keywords {
            paragraphs.push(format!(
                "When it comes to {keyword}, the details matter: {keyword} shapes the wider picture \
                 and deserves careful attention from anyone following the topic."
            ));
        }
        Ok(paragraphs.join("\n\n"))
    }
}

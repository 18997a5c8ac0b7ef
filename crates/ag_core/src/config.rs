use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Process-wide settings, built once at start-up and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub keywords: KeywordConfig,
    pub generation: GenerationConfig,
    pub history: HistoryConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_content_bytes: usize,
    pub user_agent: String,
    /// Hosts that may be fetched. Empty means unrestricted.
    pub allowed_domains: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_content_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allowed_domains: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeywordConfig {
    pub max_keywords: usize,
    pub max_text_chars: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_keywords: 10,
            max_text_chars: 50_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    Gemini,
    OpenAi,
    Dummy,
}

impl std::str::FromStr for ModelProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" | "deepseek" => Ok(Self::OpenAi),
            "dummy" => Ok(Self::Dummy),
            other => Err(Error::Config(format!("unknown model provider: {}", other))),
        }
    }
}

#[derive(Clone)]
pub struct GenerationConfig {
    pub provider: ModelProvider,
    pub api_key: Option<String>,
    pub model_name: String,
    /// Overrides the provider's endpoint root.
    pub base_url: Option<String>,
    pub max_attempts: usize,
    pub retry_delay: Duration,
    pub timeout: Duration,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::Gemini,
            api_key: None,
            model_name: "gemini-1.5-flash".to_string(),
            base_url: None,
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub cap: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("content_history.json"),
            cap: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub max_concurrent_generations: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            static_dir: PathBuf::from("static"),
            max_concurrent_generations: 4,
        }
    }
}

impl AppConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.generation.provider != ModelProvider::Dummy
            && self
                .generation
                .api_key
                .as_deref()
                .map_or(true, |key| key.trim().is_empty())
        {
            return Err(Error::Config("API_KEY environment variable not set".to_string()));
        }
        if self.generation.max_attempts == 0 {
            return Err(Error::Config("max attempts must be at least 1".to_string()));
        }
        if self.history.cap == 0 {
            return Err(Error::Config("history cap must be at least 1".to_string()));
        }
        if self.keywords.max_keywords == 0 {
            return Err(Error::Config("max keywords must be at least 1".to_string()));
        }
        if self.server.max_concurrent_generations == 0 {
            return Err(Error::Config(
                "max concurrent generations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AppConfig {
        let mut config = AppConfig::default();
        config.generation.api_key = Some("secret".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.fetch.timeout, Duration::from_secs(30));
        assert_eq!(config.keywords.max_keywords, 10);
        assert_eq!(config.keywords.max_text_chars, 50_000);
        assert_eq!(config.generation.max_attempts, 3);
        assert_eq!(config.generation.retry_delay, Duration::from_secs(1));
        assert_eq!(config.history.cap, 100);
        assert!(config.fetch.allowed_domains.is_empty());
    }

    #[test]
    fn test_api_key_required() {
        assert!(matches!(AppConfig::default().validate(), Err(Error::Config(_))));
        assert!(with_key().validate().is_ok());

        let mut dummy = AppConfig::default();
        dummy.generation.provider = ModelProvider::Dummy;
        assert!(dummy.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = with_key();
        config.history.cap = 0;
        assert!(config.validate().is_err());

        let mut config = with_key();
        config.generation.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Gemini".parse::<ModelProvider>().unwrap(), ModelProvider::Gemini);
        assert_eq!("deepseek".parse::<ModelProvider>().unwrap(), ModelProvider::OpenAi);
        assert!("gpt".parse::<ModelProvider>().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", with_key().generation);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

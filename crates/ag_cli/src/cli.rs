//! Command-line interface. Every option can also come from the environment
//! (or a `.env` file loaded before parsing).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ag_core::config::{
    FetchConfig, GenerationConfig, HistoryConfig, KeywordConfig, ModelProvider, ServerConfig,
};
use ag_core::AppConfig;
use ag_storage::StorageKind;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ag", author, version, about = "Generate articles from the keywords of a web page")]
pub struct Cli {
    /// API key for the generation service
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Generation provider: gemini, openai or dummy
    #[arg(long, env = "MODEL_PROVIDER", default_value = "gemini")]
    pub model_provider: ModelProvider,

    #[arg(long, env = "MODEL_NAME", default_value = "gemini-1.5-flash")]
    pub model_name: String,

    /// Override the provider's API root
    #[arg(long, env = "MODEL_BASE_URL")]
    pub model_base_url: Option<String>,

    /// Generation attempts before giving up
    #[arg(long, env = "MAX_RETRIES", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_retries: u32,

    #[arg(long, env = "RETRY_DELAY_MS", default_value_t = 1000)]
    pub retry_delay_ms: u64,

    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Largest page body accepted, in bytes
    #[arg(long, env = "MAX_CONTENT_LENGTH", default_value_t = 5 * 1024 * 1024)]
    pub max_content_length: usize,

    /// Comma-separated hosts that may be fetched; empty allows any
    #[arg(long, env = "ALLOWED_DOMAINS", value_delimiter = ',')]
    pub allowed_domains: Vec<String>,

    #[arg(long, env = "MAX_KEYWORDS", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_keywords: u32,

    #[arg(long, env = "HISTORY_FILE", default_value = "content_history.json")]
    pub history_file: PathBuf,

    /// Entries kept in the history log
    #[arg(long, env = "HISTORY_CAP", default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub history_cap: u32,

    /// History backend: file or memory
    #[arg(long, env = "HISTORY_STORAGE", default_value = "file")]
    pub storage: StorageKind,

    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    pub bind_addr: SocketAddr,

    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Generation requests served at once; more are rejected with 429
    #[arg(long, env = "MAX_CONCURRENT_GENERATIONS", default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_concurrent_generations: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP service
    Serve,
    /// Run one pipeline and print the result as JSON
    Generate { url: String },
    /// Print the history log, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print analytics over the history log
    Analytics,
}

impl Cli {
    pub fn to_config(&self) -> AppConfig {
        let defaults = AppConfig::default();
        AppConfig {
            fetch: FetchConfig {
                timeout: Duration::from_secs(self.fetch_timeout_secs),
                max_content_bytes: self.max_content_length,
                allowed_domains: self
                    .allowed_domains
                    .iter()
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect(),
                ..defaults.fetch
            },
            keywords: KeywordConfig {
                max_keywords: self.max_keywords as usize,
                ..defaults.keywords
            },
            generation: GenerationConfig {
                provider: self.model_provider,
                api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
                model_name: self.model_name.clone(),
                base_url: self.model_base_url.clone(),
                max_attempts: self.max_retries as usize,
                retry_delay: Duration::from_millis(self.retry_delay_ms),
                ..defaults.generation
            },
            history: HistoryConfig {
                path: self.history_file.clone(),
                cap: self.history_cap as usize,
            },
            server: ServerConfig {
                bind_addr: self.bind_addr,
                static_dir: self.static_dir.clone(),
                max_concurrent_generations: self.max_concurrent_generations as usize,
            },
        }
    }
}

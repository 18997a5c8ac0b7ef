use ag_core::{AppConfig, Result};
use ag_scrappers::PipelineManager;
use ag_storage::{create_storage, summarize};
use ag_web::{create_app, serve, AppState};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;

use cli::{Cli, Commands};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

fn build_pipeline(config: &AppConfig, cli: &Cli) -> Result<PipelineManager> {
    config.validate()?;
    if config.fetch.allowed_domains.is_empty() {
        warn!("ALLOWED_DOMAINS is empty; any host may be fetched");
    } else {
        info!(domains = ?config.fetch.allowed_domains, "Domain allow-list active");
    }

    let storage = create_storage(cli.storage, &config.history);
    let pipeline = PipelineManager::from_config(config, storage)?;
    info!(
        model = pipeline.model_name(),
        model_name = %config.generation.model_name,
        attempts = config.generation.max_attempts,
        "Generation model initialized"
    );
    Ok(pipeline)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = cli.to_config();

    match &cli.command {
        Commands::Serve => {
            let pipeline = build_pipeline(&config, &cli)?;
            let app = create_app(AppState::new(pipeline, config.server.clone()));

            let listener = tokio::net::TcpListener::bind(config.server.bind_addr).await?;
            info!(
                addr = %config.server.bind_addr,
                static_dir = %config.server.static_dir.display(),
                history = %config.history.path.display(),
                "Listening"
            );
            serve(app, listener).await?;
        }
        Commands::Generate { url } => {
            let pipeline = build_pipeline(&config, &cli)?;
            let result = pipeline.run(url).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::History { limit } => {
            let storage = create_storage(cli.storage, &config.history);
            let mut history = storage.read_all().await?;
            if let Some(limit) = limit {
                history.truncate(*limit);
            }
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        Commands::Analytics => {
            let storage = create_storage(cli.storage, &config.history);
            let history = storage.read_all().await?;
            println!("{}", serde_json::to_string_pretty(&summarize(&history))?);
        }
    }

    Ok(())
}

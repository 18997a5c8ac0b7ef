use std::sync::Arc;

use ag_core::config::ServerConfig;
use ag_core::HistoryStorage;
use ag_scrappers::PipelineManager;

pub struct AppState {
    pub pipeline: Arc<PipelineManager>,
    pub storage: Arc<dyn HistoryStorage>,
    pub server: ServerConfig,
}

impl AppState {
    /// Handlers read history through the same store the pipeline appends to.
    pub fn new(pipeline: PipelineManager, server: ServerConfig) -> Self {
        let storage = pipeline.storage();
        Self {
            pipeline: Arc::new(pipeline),
            storage,
            server,
        }
    }
}

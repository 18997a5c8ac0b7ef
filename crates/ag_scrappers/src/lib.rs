pub mod fetcher;
pub mod manager;

pub use fetcher::{clean_html, Fetcher};
pub use manager::PipelineManager;

pub mod prelude {
    pub use super::fetcher::Fetcher;
    pub use super::manager::PipelineManager;
    pub use ag_core::{Error, PipelineResult, Result};
}

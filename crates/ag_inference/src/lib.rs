pub mod keywords;
pub mod models;
pub mod prompt;

pub use keywords::KeywordExtractor;
pub use models::create_model;
pub use prompt::build_prompt;

pub mod prelude {
    pub use super::keywords::{KeywordExtractor, LexiconTagger, PosTagger};
    pub use super::models::{create_model, RetryingModel};
    pub use super::prompt::build_prompt;
    pub use ag_core::{Error, GenerationModel, Result};
}

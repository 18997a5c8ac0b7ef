pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::InMemoryStorage;

use ag_core::{HistoryLog, PipelineResult};

/// Insert at the head and evict from the tail beyond `cap`.
pub(crate) fn prepend_capped(log: &mut HistoryLog, entry: PipelineResult, cap: usize) {
    log.insert(0, entry);
    log.truncate(cap);
}

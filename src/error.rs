//! Error types returned by disk statistics extraction.

use crate::source::CommandError;

/// Failure modes of [`DiskStatExtractor::get_stats`](crate::DiskStatExtractor::get_stats).
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The disk usage command could not be run or exited abnormally.
    #[error("Disk usage command failed: {0}")]
    CommandExecution(#[from] CommandError),

    /// The command output contained no qualifying data row.
    #[error("No disk statistics found for hostname {host_name}")]
    NoStatsFound { host_name: String },
}

impl ExtractionError {
    pub fn no_stats_found(host_name: impl Into<String>) -> Self {
        Self::NoStatsFound {
            host_name: host_name.into(),
        }
    }
}

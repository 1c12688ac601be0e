//! Application state management for the service.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use diskstat_api::{DiskStatExtractor, HostnameValidator};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::request_stats::RequestStats;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub config: Arc<Config>,
    pub validator: HostnameValidator,
    /// Shared with blocking tasks that run the disk usage command.
    pub extractor: Arc<DiskStatExtractor>,
    pub request_stats: Arc<RequestStats>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Builds state whose extractor runs the configured disk usage command.
    pub fn new(config: Config) -> Self {
        let extractor = config.extractor();
        Self::with_extractor(config, extractor)
    }

    pub fn with_extractor(config: Config, extractor: DiskStatExtractor) -> Self {
        Self {
            validator: config.hostname_validator(),
            config: Arc::new(config),
            extractor: Arc::new(extractor),
            request_stats: Arc::new(RequestStats::new()),
            start_time: Instant::now(),
        }
    }
}

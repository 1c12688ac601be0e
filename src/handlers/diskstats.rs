//! Disk statistics endpoint handler.
//!
//! This module provides the `/{hostname}/diskstats` endpoint handler that
//! validates the hostname, runs the disk usage command and returns the
//! parsed row as JSON.

use axum::{
    extract::{Path, State},
    Json,
};
use diskstat_api::{DiskStatsResponse, ExtractionError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, instrument, warn};

use crate::handlers::error::ApiError;
use crate::request_stats::RequestOutcome;
use crate::state::SharedState;

/// Handler for the `/{hostname}/diskstats` endpoint.
#[instrument(skip(state))]
pub async fn diskstats_handler(
    State(state): State<SharedState>,
    Path(hostname): Path<String>,
) -> Result<Json<DiskStatsResponse>, ApiError> {
    debug!("Processing /{{hostname}}/diskstats request");
    state.request_stats.record_http_request();

    if !state.validator.validate(&hostname) {
        warn!(
            "Rejected hostname {:?} (policy: {})",
            hostname,
            state.validator.policy()
        );
        state
            .request_stats
            .record_outcome(RequestOutcome::InvalidHostname);
        return Err(ApiError::InvalidHostname);
    }

    let start = Instant::now();

    // The command blocks until it exits, keep it off the async workers
    let extractor = Arc::clone(&state.extractor);
    let host_name = hostname.clone();
    let result = tokio::task::spawn_blocking(move || extractor.get_stats(&host_name))
        .await
        .map_err(|e| {
            error!("Disk statistics task failed: {}", e);
            state
                .request_stats
                .record_outcome(RequestOutcome::CommandFailure);
            ApiError::Internal("Disk statistics task failed".to_string())
        })?;

    state
        .request_stats
        .record_extraction_duration_ms(start.elapsed().as_secs_f64() * 1000.0);

    match result {
        Ok(stats) => {
            debug!("Returning {} disk stat row(s) for {}", stats.len(), hostname);
            state.request_stats.record_outcome(RequestOutcome::Success);
            Ok(Json(DiskStatsResponse::from(stats)))
        }
        Err(e) => {
            let outcome = match &e {
                ExtractionError::NoStatsFound { .. } => {
                    debug!("{}", e);
                    RequestOutcome::NoStatsFound
                }
                ExtractionError::CommandExecution(_) => {
                    error!("Extraction for {} failed: {}", hostname, e);
                    RequestOutcome::CommandFailure
                }
            };
            state.request_stats.record_outcome(outcome);
            Err(e.into())
        }
    }
}

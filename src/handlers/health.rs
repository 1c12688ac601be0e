//! Health check endpoint handler.
//!
//! This module provides the `/health` endpoint handler that returns
//! uptime and request statistics as plain text.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::{debug, instrument};

use crate::state::SharedState;

// Time conversion constants
const SECONDS_PER_HOUR: f64 = 3600.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Handler for the /health endpoint.
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /health request");

    state.request_stats.record_http_request();

    let uptime_str = format_uptime(state.request_stats.get_uptime_seconds());
    let table = state.request_stats.render_table();

    (
        StatusCode::OK,
        [("Content-Type", "text/plain; charset=utf-8")],
        format!(
            "OK\n\nUptime: {uptime_str}\nDevice root: {}\nHostname policy: {}\n\n{table}",
            state.extractor.device_root(),
            state.validator.policy()
        ),
    )
}

/// Formats an uptime in minutes, hours or days depending on its size.
fn format_uptime(uptime_seconds: u64) -> String {
    let uptime_hours = uptime_seconds as f64 / SECONDS_PER_HOUR;
    if uptime_hours < 1.0 {
        format!("{:.1} minutes", uptime_hours * MINUTES_PER_HOUR)
    } else if uptime_hours < HOURS_PER_DAY {
        format!("{:.1} hours", uptime_hours)
    } else {
        format!("{:.1} days", uptime_hours / HOURS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::AppState;
    use axum::body::to_bytes;
    use std::sync::Arc;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(90), "1.5 minutes");
        assert_eq!(format_uptime(7200), "2.0 hours");
        assert_eq!(format_uptime(3 * 86400), "3.0 days");
    }

    #[tokio::test]
    async fn test_health_reports_stats() {
        let state = Arc::new(AppState::new(Config::default()));
        let response = health_handler(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("OK"));
        assert!(text.contains("Hostname policy: strict"));
        assert!(text.contains("Device root: /dev/"));
        assert!(text.contains("HEALTH ENDPOINT - REQUEST STATS"));
    }
}

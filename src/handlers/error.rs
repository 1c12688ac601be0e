//! Error responses for HTTP handlers.
//!
//! All error bodies are plain text. Internal details stay in the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diskstat_api::ExtractionError;

/// Plain-text body returned when hostname validation fails.
pub const INVALID_HOSTNAME_MESSAGE: &str = "Invalid hostname";

/// Plain-text body returned when the disk usage command fails.
pub const COMMAND_FAILED_MESSAGE: &str = "Failed to execute disk usage command";

/// Handler error mapped to an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// 400 - hostname rejected by the validator
    InvalidHostname,
    /// 404 - the command produced no data row
    NoStatsFound(String),
    /// 500 - the command could not run or failed
    CommandFailed,
    /// 500 - anything else (e.g. a panicked blocking task)
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidHostname => StatusCode::BAD_REQUEST,
            ApiError::NoStatsFound(_) => StatusCode::NOT_FOUND,
            ApiError::CommandFailed | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidHostname => INVALID_HOSTNAME_MESSAGE.to_string(),
            ApiError::NoStatsFound(host_name) => {
                format!("No disk statistics found for hostname {}", host_name)
            }
            ApiError::CommandFailed => COMMAND_FAILED_MESSAGE.to_string(),
            ApiError::Internal(message) => message.clone(),
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::NoStatsFound { host_name } => ApiError::NoStatsFound(host_name),
            ExtractionError::CommandExecution(_) => ApiError::CommandFailed,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [("Content-Type", "text/plain; charset=utf-8")],
            self.message(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskstat_api::CommandError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidHostname.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NoStatsFound("sda1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::CommandFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_extraction_error() {
        let err: ApiError = ExtractionError::no_stats_found("sdz").into();
        assert_eq!(err.message(), "No disk statistics found for hostname sdz");

        let err: ApiError = ExtractionError::CommandExecution(CommandError::Exit {
            program: "df".into(),
            code: Some(1),
            stderr: "secret detail".into(),
        })
        .into();
        assert!(matches!(err, ApiError::CommandFailed));
        assert!(!err.message().contains("secret detail"));
    }
}

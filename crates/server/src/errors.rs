use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Storage failure that reached the HTTP layer. Only happens when the
/// catalog runs with the strict failure policy.
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    /// `read` or `write`
    pub stage: &'static str,
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let stage = if e.is_read_failure() { "read" } else { "write" };
        Self { message: e.to_string(), stage }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.message, stage = self.stage, "catalog request failed");
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = serde_json::json!({"error": self.message, "stage": self.stage});
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_keep_their_stage() {
        let read = ServiceError::StorageRead {
            path: "p.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(ApiError::from(read).stage, "read");

        let write = ServiceError::StorageWrite {
            path: "p.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let api = ApiError::from(write);
        assert_eq!(api.stage, "write");
        assert!(api.message.starts_with("cannot write p.json"));
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

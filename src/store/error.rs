use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the remote document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The store signalled throttling and suggested how long to wait.
    #[error("store rate limited, retry suggested after {retry_after:?}")]
    RateLimited { retry_after: Duration },
    #[error("store returned status {status}: {body}")]
    Service { status: StatusCode, body: String },
    #[error("resource conflict: {0}")]
    Conflict(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// Server-suggested wait, present only on rate-limited failures.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            StoreError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Whether retrying can help. Authorization failures, malformed requests,
    /// conflicts, and undecodable responses are final; conflicts in
    /// particular are handled by the caller (create races), never waited out.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Http(_) | StoreError::RateLimited { .. } => true,
            StoreError::Service { status, .. } => status.is_server_error(),
            StoreError::Conflict(_)
            | StoreError::NotFound(_)
            | StoreError::Unauthorized(_)
            | StoreError::BadRequest(_)
            | StoreError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        let throttled = StoreError::RateLimited {
            retry_after: Duration::from_millis(250),
        };
        assert!(throttled.is_transient());
        assert_eq!(throttled.retry_after(), Some(Duration::from_millis(250)));

        let unavailable = StoreError::Service {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "busy".to_string(),
        };
        assert!(unavailable.is_transient());
        assert_eq!(unavailable.retry_after(), None);
    }

    #[test]
    fn client_side_errors_are_final() {
        assert!(!StoreError::Unauthorized("bad key".to_string()).is_transient());
        assert!(!StoreError::BadRequest("malformed".to_string()).is_transient());
        assert!(!StoreError::Conflict("exists".to_string()).is_transient());
        let teapot = StoreError::Service {
            status: StatusCode::IM_A_TEAPOT,
            body: String::new(),
        };
        assert!(!teapot.is_transient());
    }
}

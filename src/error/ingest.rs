//! Session-ending ingestion errors.

use thiserror::Error;

use super::ErrorKind;
use crate::traits::HttpError;

/// Message used when an `error` frame carries no message.
pub const DEFAULT_SERVER_ERROR_MESSAGE: &str = "import failed";

/// Message used when a failed upload response has an empty body.
pub const DEFAULT_TRANSPORT_MESSAGE: &str = "ingest failed";

/// Why an ingestion session ended without a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    /// The upload was answered with a non-2xx status; the body was not streamed.
    #[error("ingest request rejected ({status}): {message}")]
    Transport { status: u16, message: String },

    /// The upload never got a response.
    #[error("could not reach ingest server: {0}")]
    Connection(HttpError),

    /// Reading the response body failed part-way through.
    #[error("ingest stream interrupted: {0}")]
    Stream(HttpError),

    /// The server sent an `error` step.
    #[error("{message}")]
    ServerReported { message: String },

    /// The stream ended without a `done` step carrying `doc_id` and `chunks`.
    #[error("incomplete import")]
    Incomplete,
}

impl IngestError {
    /// Build a transport error, falling back to a default for an empty body.
    pub fn transport(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.trim().is_empty() {
            DEFAULT_TRANSPORT_MESSAGE.to_string()
        } else {
            body
        };
        IngestError::Transport { status, message }
    }

    /// Build a server-reported error, falling back to a default for an empty message.
    pub fn server_reported(message: &str) -> Self {
        let message = if message.is_empty() {
            DEFAULT_SERVER_ERROR_MESSAGE
        } else {
            message
        };
        IngestError::ServerReported {
            message: message.to_string(),
        }
    }

    /// Taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::Transport { .. } | IngestError::Connection(_) | IngestError::Stream(_) => {
                ErrorKind::Transport
            }
            IngestError::ServerReported { .. } => ErrorKind::ServerReported,
            IngestError::Incomplete => ErrorKind::Incomplete,
        }
    }

    /// Check if this error is likely transient. This layer never retries;
    /// the hint is for callers that might.
    pub fn is_retryable(&self) -> bool {
        match self {
            IngestError::Transport { status, .. } => *status >= 500 || *status == 429,
            IngestError::Connection(_) | IngestError::Stream(_) => true,
            IngestError::ServerReported { .. } | IngestError::Incomplete => false,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            IngestError::Transport { .. } => "E_INGEST_STATUS",
            IngestError::Connection(_) => "E_INGEST_CONN",
            IngestError::Stream(_) => "E_INGEST_STREAM",
            IngestError::ServerReported { .. } => "E_INGEST_SERVER",
            IngestError::Incomplete => "E_INGEST_INCOMPLETE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_keeps_body_text() {
        let err = IngestError::transport(413, "file too large");
        assert_eq!(
            err,
            IngestError::Transport {
                status: 413,
                message: "file too large".to_string()
            }
        );
        assert_eq!(err.to_string(), "ingest request rejected (413): file too large");
    }

    #[test]
    fn test_transport_default_message() {
        let err = IngestError::transport(502, "  ");
        assert_eq!(
            err,
            IngestError::Transport {
                status: 502,
                message: DEFAULT_TRANSPORT_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_server_reported_message() {
        assert_eq!(IngestError::server_reported("boom").to_string(), "boom");
        assert_eq!(
            IngestError::server_reported("").to_string(),
            DEFAULT_SERVER_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_incomplete_display() {
        assert_eq!(IngestError::Incomplete.to_string(), "incomplete import");
        assert_eq!(IngestError::Incomplete.error_code(), "E_INGEST_INCOMPLETE");
    }

    #[test]
    fn test_retryable() {
        assert!(IngestError::transport(503, "busy").is_retryable());
        assert!(IngestError::transport(429, "slow down").is_retryable());
        assert!(!IngestError::transport(400, "bad").is_retryable());
        assert!(IngestError::Stream(HttpError::Io("reset".to_string())).is_retryable());
        assert!(IngestError::Connection(HttpError::Timeout("10s".to_string())).is_retryable());
        assert!(!IngestError::server_reported("boom").is_retryable());
        assert!(!IngestError::Incomplete.is_retryable());
    }
}

//! Error kind classification for the ingestion taxonomy.

use std::fmt;

/// The four classes of failure a streamed ingestion can run into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The HTTP exchange itself failed (status, connection, broken body).
    Transport,

    /// A `data:` payload could not be decoded.
    /// Dropped by the parser; the session carries on.
    DecodeSkip,

    /// The server sent an `error` step.
    ServerReported,

    /// The stream ended without a `done` step carrying a result.
    Incomplete,
}

impl ErrorKind {
    /// Returns true if errors of this kind are handled inside the pipeline
    /// and never reach the caller.
    pub fn is_recovered_locally(&self) -> bool {
        matches!(self, ErrorKind::DecodeSkip)
    }

    /// Returns a short label for the kind suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::DecodeSkip => "decode_skip",
            ErrorKind::ServerReported => "server_reported",
            ErrorKind::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

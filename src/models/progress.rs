use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Step tags emitted by the ingestion server.
///
/// The set is open: servers may add steps at any time and clients forward
/// them untouched. Only [`DONE`] and [`ERROR`] carry meaning for the session.
pub mod steps {
    pub const CONVERTING: &str = "converting";
    pub const CHUNKING: &str = "chunking";
    pub const STORING: &str = "storing";
    pub const DONE: &str = "done";
    pub const ERROR: &str = "error";
}

/// One progress notification decoded from a `data:` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Open-ended step tag (`converting`, `chunking`, `storing`, `done`, `error`, ...)
    pub step: String,
    /// Human-readable status line; empty when the server sent none
    pub message: String,
    /// Identifier of the stored document, set on `done`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    /// Number of chunks stored, set on `done`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<u64>,
}

impl ProgressEvent {
    /// Create an event with only a step and a message.
    pub fn new(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            message: message.into(),
            doc_id: None,
            chunks: None,
        }
    }

    /// Create a `done` event carrying the stored document id and chunk count.
    pub fn done(doc_id: impl Into<String>, chunks: u64) -> Self {
        Self {
            step: steps::DONE.to_string(),
            message: String::new(),
            doc_id: Some(doc_id.into()),
            chunks: Some(chunks),
        }
    }

    /// Build an event from a decoded frame object.
    ///
    /// Only `step` is required, and it must be a string. The other fields are
    /// read leniently: a `message` that is not a string becomes empty, and a
    /// mistyped `doc_id` or `chunks` is treated as absent. `chunks` accepts
    /// whole non-negative numbers written as floats (`3.0`).
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let step = object.get("step")?.as_str()?;
        Some(Self {
            step: step.to_string(),
            message: object
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            doc_id: object.get("doc_id").and_then(Value::as_str).map(str::to_owned),
            chunks: object.get("chunks").and_then(chunk_count),
        })
    }

    /// Classify this event for terminal-state detection.
    pub fn kind(&self) -> EventKind<'_> {
        match self.step.as_str() {
            steps::ERROR => EventKind::Failed {
                message: &self.message,
            },
            steps::DONE => match (self.doc_id.as_deref(), self.chunks) {
                (Some(doc_id), Some(chunks)) => EventKind::Completed { doc_id, chunks },
                _ => EventKind::IncompleteDone,
            },
            _ => EventKind::Progress,
        }
    }
}

fn chunk_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
            .map(|n| n as u64)
    })
}

/// What a [`ProgressEvent`] means for the session that received it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind<'a> {
    /// `error` step: the server gave up on the document
    Failed { message: &'a str },
    /// `done` step carrying both `doc_id` and `chunks`
    Completed { doc_id: &'a str, chunks: u64 },
    /// `done` step missing `doc_id` or `chunks`; not a result
    IncompleteDone,
    /// Any other step, known or not
    Progress,
}

impl EventKind<'_> {
    /// Returns true if this event ends the session on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::Failed { .. })
    }
}

/// Final outcome of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    /// Document id assigned by the server
    pub id: String,
    /// File name from the caller's upload, never from the stream
    pub filename: String,
    /// Number of chunks stored for the document
    pub chunks: u64,
}

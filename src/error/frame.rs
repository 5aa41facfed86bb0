//! Frame payload decoding errors.

use thiserror::Error;

use super::ErrorKind;

/// Payloads longer than this are truncated in error messages.
const PAYLOAD_PREVIEW_LEN: usize = 80;

/// A `data:` frame whose payload is not a usable progress event.
///
/// This is the DecodeSkip class: the frame parser logs it and moves on to
/// the next line. It is deliberately not convertible into [`super::IngestError`].
/// A frame with a string `step` never produces one, whatever its other
/// fields hold.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The payload is not valid JSON (bad syntax or truncated).
    #[error("malformed JSON in frame `{preview}`: {source}")]
    Syntax {
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    /// The payload is valid JSON but has no string `step` to dispatch on.
    #[error("frame `{preview}` has no step: {reason}")]
    Shape { preview: String, reason: &'static str },
}

impl FrameError {
    /// A payload that failed to parse as JSON.
    pub fn syntax(payload: &str, source: serde_json::Error) -> Self {
        FrameError::Syntax {
            preview: preview(payload),
            source,
        }
    }

    /// A JSON payload that cannot become an event.
    pub fn shape(payload: &str, reason: &'static str) -> Self {
        FrameError::Shape {
            preview: preview(payload),
            reason,
        }
    }

    /// Frame errors are always DecodeSkips.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::DecodeSkip
    }
}

fn preview(payload: &str) -> String {
    match payload.char_indices().nth(PAYLOAD_PREVIEW_LEN) {
        Some((end, _)) => format!("{}...", &payload[..end]),
        None => payload.to_string(),
    }
}

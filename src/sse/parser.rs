//! Event frame extraction.
//!
//! The ingest stream carries one frame per line:
//! - `data: <json>` - a progress event payload
//! - anything else (blank separators, `: comments`, `event:`/`id:` fields) - ignored

use serde_json::Value;

use crate::error::FrameError;
use crate::models::ProgressEvent;

/// Exact prefix that marks a frame line.
pub const DATA_PREFIX: &str = "data: ";

/// A decoded line, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLine<'a> {
    /// Frame payload (the text after `data: `)
    Data(&'a str),
    /// Not a frame; carries no meaning
    Ignored,
}

/// Classify a single line from the stream.
pub fn parse_frame_line(line: &str) -> FrameLine<'_> {
    match line.strip_prefix(DATA_PREFIX) {
        Some(payload) => FrameLine::Data(payload),
        None => FrameLine::Ignored,
    }
}

/// Decode a frame payload into a [`ProgressEvent`].
///
/// Only the JSON syntax is strict. Any object with a string `step` becomes
/// an event, so a well-formed `error` frame always reaches the dispatcher.
pub fn parse_progress_event(payload: &str) -> Result<ProgressEvent, FrameError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| FrameError::syntax(payload, e))?;
    let object = value
        .as_object()
        .ok_or_else(|| FrameError::shape(payload, "not a JSON object"))?;
    ProgressEvent::from_object(object)
        .ok_or_else(|| FrameError::shape(payload, "missing string `step` field"))
}

/// Stateful frame parser that drops undecodable frames.
///
/// `feed_line` only ever yields events; a [`FrameError`] is logged and
/// counted, and has no path to the session outcome.
#[derive(Debug, Default)]
pub struct FrameParser {
    frames: usize,
    skipped: usize,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded line; returns the event it carries, if any.
    pub fn feed_line(&mut self, line: &str) -> Option<ProgressEvent> {
        let FrameLine::Data(payload) = parse_frame_line(line) else {
            return None;
        };

        match parse_progress_event(payload) {
            Ok(event) => {
                self.frames += 1;
                Some(event)
            }
            Err(e) => {
                self.skipped += 1;
                tracing::warn!(error = %e, "Skipping undecodable frame");
                None
            }
        }
    }

    /// Number of frames decoded into events.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of frames dropped as undecodable.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

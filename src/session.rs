//! One streamed ingestion, from open response body to final outcome.
//!
//! ```text
//! Started -> Streaming -> Succeeded | Failed
//! ```
//!
//! `Streaming` is entered on the first decoded frame and re-entered for each
//! one after. `Failed` comes from an `error` frame, a broken body, or a body
//! that ends without a complete `done` frame. Both terminal states absorb.
//! Apart from a broken body, terminal states are only set by
//! [`IngestSession::run`].

use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};

use crate::dispatcher::ProgressDispatcher;
use crate::error::IngestError;
use crate::models::{IngestResult, ProgressEvent};
use crate::sse::{lines, FrameParser, LineStream};
use crate::traits::HttpError;

/// Lifecycle of an [`IngestSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Body acquired, nothing decoded yet
    Started,
    /// At least one frame decoded; more may follow
    Streaming,
    /// Body drained with a recorded result
    Succeeded,
    /// Ended by an `error` frame, a transport failure, or an incomplete stream
    Failed,
}

impl SessionState {
    /// Returns true for the absorbing states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Succeeded | SessionState::Failed)
    }
}

/// Owns one response body and reduces it to one outcome.
///
/// The body is held exclusively by the session and dropped as soon as the
/// session reaches a terminal state, so an early `error` frame releases the
/// connection without draining it.
pub struct IngestSession {
    filename: String,
    /// `None` once the body has been released
    lines: Option<LineStream>,
    parser: FrameParser,
    state: SessionState,
}

impl IngestSession {
    /// Start a session over `body` for an upload named `filename`.
    pub fn new<S>(filename: impl Into<String>, body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Unpin + Send + 'static,
    {
        Self {
            filename: filename.into(),
            lines: Some(lines(body)),
            parser: FrameParser::new(),
            state: SessionState::Started,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// File name results of this session will carry.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns true while the session still holds its response body.
    pub fn holds_body(&self) -> bool {
        self.lines.is_some()
    }

    /// Pull the next well-formed event off the body.
    ///
    /// Undecodable frames are skipped. Returns `Ok(None)` once the body is
    /// exhausted or released, and `Err(IngestError::Stream)` if reading fails;
    /// either way the body is released. No terminal rules are applied here:
    /// pull-based callers feed events to a [`ProgressDispatcher`] themselves.
    ///
    /// Only a read failure moves the state to `Failed` from here. End of
    /// stream leaves it at `Started` or `Streaming` since success depends on
    /// the frames seen; use [`IngestSession::holds_body`] to tell that the
    /// body is done, or [`IngestSession::run`] to reach `Succeeded`.
    pub async fn next_event(&mut self) -> Result<Option<ProgressEvent>, IngestError> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };

        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => {
                    if let Some(event) = self.parser.feed_line(&line) {
                        self.state = SessionState::Streaming;
                        return Ok(Some(event));
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Ingest stream read failed");
                    self.lines = None;
                    self.state = SessionState::Failed;
                    return Err(IngestError::Stream(e));
                }
            }
        }

        self.lines = None;
        Ok(None)
    }

    /// Drive the session to its outcome, calling `on_progress` for every
    /// well-formed event in arrival order.
    ///
    /// The callback runs inline on the read loop; a slow callback stalls
    /// decoding.
    pub async fn run<F>(mut self, on_progress: F) -> Result<IngestResult, IngestError>
    where
        F: FnMut(&ProgressEvent),
    {
        tracing::debug!(filename = %self.filename, "Ingest session started");
        let mut dispatcher = ProgressDispatcher::new(self.filename.clone(), on_progress);

        let outcome = loop {
            match self.next_event().await {
                Ok(Some(event)) => {
                    if let Err(e) = dispatcher.dispatch(&event) {
                        break Err(e);
                    }
                }
                Ok(None) => break dispatcher.finish(),
                Err(e) => break Err(e),
            }
        };

        self.conclude(&outcome);
        outcome
    }

    fn conclude(&mut self, outcome: &Result<IngestResult, IngestError>) {
        self.lines = None;
        self.state = match outcome {
            Ok(result) => {
                tracing::info!(
                    doc_id = %result.id,
                    chunks = result.chunks,
                    frames = self.parser.frames(),
                    skipped = self.parser.skipped(),
                    "Ingest session succeeded"
                );
                SessionState::Succeeded
            }
            Err(e) => {
                tracing::info!(
                    code = e.error_code(),
                    error = %e,
                    frames = self.parser.frames(),
                    skipped = self.parser.skipped(),
                    "Ingest session failed"
                );
                SessionState::Failed
            }
        };
    }
}

impl std::fmt::Debug for IngestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestSession")
            .field("filename", &self.filename)
            .field("holds_body", &self.holds_body())
            .field("parser", &self.parser)
            .field("state", &self.state)
            .finish()
    }
}

//! Progress delivery and terminal-state detection.
//!
//! Every well-formed event goes to the caller's callback first, then gets
//! classified: an `error` step fails the session on the spot, a complete
//! `done` step records a candidate result, everything else passes through.

use crate::error::IngestError;
use crate::models::{EventKind, IngestResult, ProgressEvent};

/// Delivers events to a progress callback and tracks the candidate result.
///
/// # Example
///
/// ```
/// use ingest_client::{ProgressDispatcher, ProgressEvent};
///
/// let mut seen = Vec::new();
/// let mut dispatcher = ProgressDispatcher::new("report.pdf", |e: &ProgressEvent| seen.push(e.step.clone()));
/// dispatcher.dispatch(&ProgressEvent::new("converting", "")).unwrap();
/// dispatcher.dispatch(&ProgressEvent::done("d1", 3)).unwrap();
/// let result = dispatcher.finish().unwrap();
/// assert_eq!(result.id, "d1");
/// assert_eq!(result.filename, "report.pdf");
/// assert_eq!(seen, vec!["converting", "done"]);
/// ```
pub struct ProgressDispatcher<F> {
    filename: String,
    on_progress: F,
    candidate: Option<IngestResult>,
    dispatched: usize,
}

impl<F> ProgressDispatcher<F>
where
    F: FnMut(&ProgressEvent),
{
    /// Create a dispatcher for an upload named `filename`.
    pub fn new(filename: impl Into<String>, on_progress: F) -> Self {
        Self {
            filename: filename.into(),
            on_progress,
            candidate: None,
            dispatched: 0,
        }
    }

    /// Deliver one event and apply the terminal rules.
    ///
    /// Returns `Err` only for an `error` step; the callback has already seen
    /// that event when this returns.
    pub fn dispatch(&mut self, event: &ProgressEvent) -> Result<(), IngestError> {
        (self.on_progress)(event);
        self.dispatched += 1;

        match event.kind() {
            EventKind::Failed { message } => {
                tracing::info!(reason = message, "Server reported ingestion failure");
                Err(IngestError::server_reported(message))
            }
            EventKind::Completed { doc_id, chunks } => {
                tracing::debug!(doc_id, chunks, "Recorded candidate result");
                self.candidate = Some(IngestResult {
                    id: doc_id.to_string(),
                    filename: self.filename.clone(),
                    chunks,
                });
                Ok(())
            }
            EventKind::IncompleteDone => {
                tracing::debug!("Done step without doc_id or chunks; no result recorded");
                Ok(())
            }
            EventKind::Progress => Ok(()),
        }
    }

    /// The result recorded so far, if any.
    pub fn candidate(&self) -> Option<&IngestResult> {
        self.candidate.as_ref()
    }

    /// Number of events delivered to the callback.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Resolve at end-of-stream: the recorded result, or an incomplete import.
    pub fn finish(self) -> Result<IngestResult, IngestError> {
        self.candidate.ok_or(IngestError::Incomplete)
    }
}

impl<F> std::fmt::Debug for ProgressDispatcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressDispatcher")
            .field("filename", &self.filename)
            .field("candidate", &self.candidate)
            .field("dispatched", &self.dispatched)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DEFAULT_SERVER_ERROR_MESSAGE;

    fn recording() -> (std::rc::Rc<std::cell::RefCell<Vec<String>>>, impl FnMut(&ProgressEvent)) {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |e: &ProgressEvent| sink.borrow_mut().push(e.step.clone()))
    }

    #[test]
    fn test_progress_then_done() {
        let (seen, cb) = recording();
        let mut dispatcher = ProgressDispatcher::new("a.pdf", cb);

        dispatcher.dispatch(&ProgressEvent::new("converting", "x")).unwrap();
        dispatcher.dispatch(&ProgressEvent::done("d1", 3)).unwrap();

        assert_eq!(dispatcher.dispatched(), 2);
        assert_eq!(*seen.borrow(), vec!["converting", "done"]);
        assert_eq!(
            dispatcher.finish().unwrap(),
            IngestResult {
                id: "d1".to_string(),
                filename: "a.pdf".to_string(),
                chunks: 3
            }
        );
    }

    #[test]
    fn test_error_step_is_delivered_then_fails() {
        let (seen, cb) = recording();
        let mut dispatcher = ProgressDispatcher::new("a.pdf", cb);

        let err = dispatcher
            .dispatch(&ProgressEvent::new("error", "boom"))
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::ServerReported {
                message: "boom".to_string()
            }
        );
        assert_eq!(*seen.borrow(), vec!["error"]);
    }

    #[test]
    fn test_error_step_default_message() {
        let mut dispatcher = ProgressDispatcher::new("a.pdf", |_: &ProgressEvent| {});
        let err = dispatcher.dispatch(&ProgressEvent::new("error", "")).unwrap_err();
        assert_eq!(
            err,
            IngestError::ServerReported {
                message: "import failed".to_string()
            }
        );
        assert_eq!(err.to_string(), DEFAULT_SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn test_done_without_fields_records_nothing() {
        let (seen, cb) = recording();
        let mut dispatcher = ProgressDispatcher::new("a.pdf", cb);

        let mut event = ProgressEvent::done("d1", 3);
        event.chunks = None;
        dispatcher.dispatch(&event).unwrap();

        assert_eq!(seen.borrow().len(), 1);
        assert!(dispatcher.candidate().is_none());
        assert_eq!(dispatcher.finish(), Err(IngestError::Incomplete));
    }

    #[test]
    fn test_events_after_done_still_dispatched() {
        let (seen, cb) = recording();
        let mut dispatcher = ProgressDispatcher::new("a.pdf", cb);

        dispatcher.dispatch(&ProgressEvent::done("d1", 3)).unwrap();
        dispatcher.dispatch(&ProgressEvent::new("cleanup", "")).unwrap();

        assert_eq!(*seen.borrow(), vec!["done", "cleanup"]);
        assert_eq!(dispatcher.candidate().map(|r| r.id.as_str()), Some("d1"));
    }

    #[test]
    fn test_last_done_wins() {
        let mut dispatcher = ProgressDispatcher::new("a.pdf", |_: &ProgressEvent| {});
        dispatcher.dispatch(&ProgressEvent::done("d1", 3)).unwrap();
        dispatcher.dispatch(&ProgressEvent::done("d2", 5)).unwrap();
        let result = dispatcher.finish().unwrap();
        assert_eq!(result.id, "d2");
        assert_eq!(result.chunks, 5);
    }

    #[test]
    fn test_no_events_is_incomplete() {
        let dispatcher = ProgressDispatcher::new("a.pdf", |_: &ProgressEvent| {});
        assert_eq!(dispatcher.finish(), Err(IngestError::Incomplete));
    }
}

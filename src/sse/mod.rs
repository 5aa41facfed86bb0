//! Decoding of the ingest event stream.
//!
//! Bytes flow through two stages:
//! - [`StreamDecoder`] - raw chunks to complete text lines
//! - [`FrameParser`] - lines to [`crate::models::ProgressEvent`]s
//!
//! [`lines`] glues the first stage onto an HTTP body stream.

mod decoder;
mod parser;

pub use decoder::StreamDecoder;
pub use parser::{
    parse_frame_line, parse_progress_event, FrameLine, FrameParser, DATA_PREFIX,
};

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;

use crate::traits::HttpError;

/// Lazily decoded lines of a response body.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, HttpError>> + Send>>;

struct LineState<S> {
    body: S,
    /// `None` once the body has ended or failed
    decoder: Option<StreamDecoder>,
    ready: VecDeque<String>,
}

/// Turn a body byte stream into a lazy, finite stream of complete lines.
///
/// A transport error is yielded once and ends the stream. Text after the
/// last newline is discarded when the body ends.
pub fn lines<S>(body: S) -> LineStream
where
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin + Send + 'static,
{
    let state = LineState {
        body,
        decoder: Some(StreamDecoder::new()),
        ready: VecDeque::new(),
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(line) = state.ready.pop_front() {
                return Some((Ok(line), state));
            }

            let decoder = state.decoder.as_mut()?;
            match state.body.next().await {
                Some(Ok(chunk)) => state.ready.extend(decoder.feed(&chunk)),
                Some(Err(e)) => {
                    state.decoder = None;
                    return Some((Err(e), state));
                }
                None => {
                    if let Some(decoder) = state.decoder.take() {
                        decoder.finish();
                    }
                    return None;
                }
            }
        }
    }))
}

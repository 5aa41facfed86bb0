//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that returns scripted byte
//! streams or errors, records every upload, and tracks whether the body
//! streams it handed out have been released.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::UploadFile;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded upload for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Multipart field name of the file part
    pub field: String,
    /// File name of the uploaded part
    pub filename: String,
    /// Uploaded file contents
    pub content: Bytes,
    /// Request headers
    pub headers: Headers,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Answer with a body delivered as these chunks, in order
    Stream(Vec<Bytes>),
    /// Deliver these chunks, then fail the next read
    StreamThenError(Vec<Bytes>, HttpError),
    /// Fail the request before any body is available
    Error(HttpError),
}

impl MockResponse {
    /// Stream the given text split into chunks at the given byte offsets.
    ///
    /// Offsets may fall inside a multi-byte character.
    pub fn split_at(text: &str, offsets: &[usize]) -> Self {
        let bytes = text.as_bytes();
        let mut chunks = Vec::with_capacity(offsets.len() + 1);
        let mut start = 0;
        for &offset in offsets {
            let end = offset.min(bytes.len()).max(start);
            chunks.push(Bytes::copy_from_slice(&bytes[start..end]));
            start = end;
        }
        chunks.push(Bytes::copy_from_slice(&bytes[start..]));
        MockResponse::Stream(chunks)
    }
}

/// Decrements the open-stream counter when the body stream is dropped.
struct ReleaseGuard(Arc<AtomicUsize>);

impl ReleaseGuard {
    fn open(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use ingest_client::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_default_response(MockResponse::Stream(vec![
///     Bytes::from("data: {\"step\":\"done\",\"doc_id\":\"d1\",\"chunks\":3}\n"),
/// ]));
///
/// // ... run a session against `client` ...
///
/// assert_eq!(client.get_requests().len(), 1);
/// assert_eq!(client.open_streams(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Body streams handed out and not yet dropped
    open_streams: Arc<AtomicUsize>,
    /// Chunks actually pulled from body streams
    chunks_read: Arc<AtomicUsize>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a specific URL (matched exactly).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of body streams handed out that have not been dropped yet.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    /// Total number of chunks consumers have pulled from body streams.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read.load(Ordering::SeqCst)
    }

    fn record_request(&self, url: &str, field: &str, file: &UploadFile, headers: &Headers) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            url: url.to_string(),
            field: field.to_string(),
            filename: file.filename.clone(),
            content: file.content.clone(),
            headers: headers.clone(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }
        self.default_response.lock().unwrap().clone()
    }

    fn body_stream(&self, items: Vec<Result<Bytes, HttpError>>) -> ByteStream {
        let guard = ReleaseGuard::open(Arc::clone(&self.open_streams));
        let chunks_read = Arc::clone(&self.chunks_read);
        let stream = futures::stream::iter(items).map(move |item| {
            let _guard = &guard;
            chunks_read.fetch_add(1, Ordering::SeqCst);
            item
        });
        Box::pin(stream)
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_multipart_stream(
        &self,
        url: &str,
        field: &str,
        file: &UploadFile,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, field, file, headers);

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(self.body_stream(chunks.into_iter().map(Ok).collect()))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let items = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(err)))
                    .collect();
                Ok(self.body_stream(items))
            }
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

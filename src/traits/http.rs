//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for the one HTTP exchange the ingest
//! client needs - a multipart upload answered by a streamed body - enabling
//! dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

use crate::models::UploadFile;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Response body delivered incrementally, in transport-sized chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
    /// Server returned an error status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    /// Request was cancelled
    #[error("Request cancelled")]
    Cancelled,
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Other error
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Trait for HTTP client operations.
///
/// Implementations include the production reqwest-based client and a mock
/// client for testing.
///
/// # Example
///
/// ```ignore
/// use ingest_client::traits::{HttpClient, Headers};
/// use ingest_client::UploadFile;
///
/// async fn upload<C: HttpClient>(client: &C, file: &UploadFile) {
///     let body = client
///         .post_multipart_stream("http://localhost:8000/api/rag/ingest-stream", "file", file, &Headers::new())
///         .await?;
///     // consume `body` chunk by chunk
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POST a multipart form with a single file part and return the response
    /// body as a stream.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `field` - Form field name for the file part
    /// * `file` - The file to upload
    /// * `headers` - Request headers
    ///
    /// # Returns
    /// The body as a stream of byte chunks. A non-2xx status must be reported
    /// as [`HttpError::ServerError`] carrying the body text, without exposing
    /// the body as a stream.
    async fn post_multipart_stream(
        &self,
        url: &str,
        field: &str,
        file: &UploadFile,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}

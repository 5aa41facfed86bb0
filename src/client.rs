//! Ingest API client.
//!
//! Uploads a document to the streaming ingest endpoint and follows the
//! progress stream the server answers with.

use crate::adapters::ReqwestHttpClient;
use crate::config::{ClientConfig, API_KEY_HEADER};
use crate::error::IngestError;
use crate::models::{IngestResult, ProgressEvent, UploadFile};
use crate::session::IngestSession;
use crate::traits::{Headers, HttpClient, HttpError};

/// Client for the streaming ingest endpoint.
///
/// Generic over the transport so tests can swap in
/// [`crate::adapters::MockHttpClient`].
#[derive(Debug, Clone)]
pub struct IngestClient<C = ReqwestHttpClient> {
    config: ClientConfig,
    http: C,
}

impl IngestClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest.
    pub fn new(config: ClientConfig) -> Result<Self, IngestError> {
        let http = ReqwestHttpClient::with_connect_timeout(config.connect_timeout)
            .map_err(IngestError::Connection)?;
        Ok(Self { config, http })
    }
}

impl<C: HttpClient> IngestClient<C> {
    /// Create a client over any [`HttpClient`].
    pub fn with_http(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(key) = &self.config.api_key {
            headers.insert(API_KEY_HEADER.to_string(), key.clone());
        }
        headers
    }

    /// Upload `file` and return the session reading the server's answer.
    ///
    /// A non-2xx answer fails here with [`IngestError::Transport`] carrying the
    /// response body text; no stream is ever opened for it.
    pub async fn open_session(&self, file: &UploadFile) -> Result<IngestSession, IngestError> {
        let url = self.config.ingest_url();
        tracing::debug!(url = %url, filename = %file.filename, bytes = file.len(), "Uploading document");

        let body = self
            .http
            .post_multipart_stream(&url, &self.config.upload_field, file, &self.headers())
            .await
            .map_err(|e| match e {
                HttpError::ServerError { status, message } => {
                    tracing::warn!(status, "Ingest upload rejected");
                    IngestError::transport(status, message)
                }
                other => IngestError::Connection(other),
            })?;

        Ok(IngestSession::new(file.filename.clone(), body))
    }

    /// Upload `file`, report each progress event to `on_progress` in arrival
    /// order, and return the stored document once the stream completes.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = IngestClient::new(ClientConfig::from_env())?;
    /// let file = UploadFile::from_path("report.pdf").await?;
    /// let result = client
    ///     .ingest_with_progress(&file, |event| println!("[{}] {}", event.step, event.message))
    ///     .await?;
    /// println!("stored {} as {} ({} chunks)", result.filename, result.id, result.chunks);
    /// ```
    pub async fn ingest_with_progress<F>(
        &self,
        file: &UploadFile,
        on_progress: F,
    ) -> Result<IngestResult, IngestError>
    where
        F: FnMut(&ProgressEvent),
    {
        self.open_session(file).await?.run(on_progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};

    fn client(mock: &MockHttpClient, config: ClientConfig) -> IngestClient<MockHttpClient> {
        IngestClient::with_http(config, mock.clone())
    }

    #[test]
    fn test_new_with_reqwest() {
        assert!(IngestClient::new(ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_headers_without_api_key() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Stream(vec![]));
        let client = client(&mock, ClientConfig::default());

        let _ = client
            .ingest_with_progress(&UploadFile::new("a.txt", b"x".to_vec()), |_| {})
            .await;

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://localhost:8000/api/rag/ingest-stream");
        assert_eq!(requests[0].field, "file");
        assert!(!requests[0].headers.contains_key(API_KEY_HEADER));
        assert_eq!(
            requests[0].headers.get("Accept"),
            Some(&"text/event-stream".to_string())
        );
    }

    #[tokio::test]
    async fn test_headers_with_api_key() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Stream(vec![]));
        let client = client(&mock, ClientConfig::default().with_api_key("secret"));

        let _ = client
            .ingest_with_progress(&UploadFile::new("a.txt", b"x".to_vec()), |_| {})
            .await;

        assert_eq!(
            mock.get_requests()[0].headers.get(API_KEY_HEADER),
            Some(&"secret".to_string())
        );
    }

    #[tokio::test]
    async fn test_server_error_becomes_transport_error() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(HttpError::ServerError {
            status: 422,
            message: "unsupported format".to_string(),
        }));
        let client = client(&mock, ClientConfig::default());

        let mut calls = 0;
        let err = client
            .ingest_with_progress(&UploadFile::new("a.bin", b"x".to_vec()), |_| calls += 1)
            .await
            .unwrap_err();

        assert_eq!(err, IngestError::transport(422, "unsupported format"));
        assert_eq!(calls, 0);
        assert_eq!(mock.chunks_read(), 0);
    }

    #[tokio::test]
    async fn test_connection_error() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));
        let client = client(&mock, ClientConfig::default());

        let err = client
            .ingest_with_progress(&UploadFile::new("a.txt", b"x".to_vec()), |_| {})
            .await
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::Connection(HttpError::ConnectionFailed("refused".to_string()))
        );
    }
}

//! Client configuration.

use std::time::Duration;

/// Environment variable holding the server base URL.
pub const ENV_API_URL: &str = "INGEST_API_URL";
/// Environment variable holding the API key sent as `X-API-Key`.
pub const ENV_API_KEY: &str = "INGEST_API_KEY";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_INGEST_PATH: &str = "/api/rag/ingest-stream";
pub const DEFAULT_UPLOAD_FIELD: &str = "file";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Where and how to reach the ingestion server.
///
/// Use the builder methods to customize.
///
/// # Example
///
/// ```
/// use ingest_client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://rag.example.com/")
///     .with_api_key("secret");
/// assert_eq!(config.ingest_url(), "https://rag.example.com/api/rag/ingest-stream");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server base URL (default: http://localhost:8000)
    pub base_url: String,
    /// API key sent as `X-API-Key` when set
    pub api_key: Option<String>,
    /// Path of the streaming ingest endpoint
    pub ingest_path: String,
    /// Multipart field name of the uploaded file
    pub upload_field: String,
    /// How long to wait for the TCP/TLS connection
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            ingest_path: DEFAULT_INGEST_PATH.to_string(),
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from `INGEST_API_URL` and `INGEST_API_KEY`.
    /// Unset or blank variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = non_blank_var(ENV_API_URL) {
            config.base_url = url;
        }
        config.api_key = non_blank_var(ENV_API_KEY);
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_ingest_path(mut self, path: impl Into<String>) -> Self {
        self.ingest_path = path.into();
        self
    }

    pub fn with_upload_field(mut self, field: impl Into<String>) -> Self {
        self.upload_field = field.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Full URL of the streaming ingest endpoint.
    pub fn ingest_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.ingest_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

//! Mock implementations for testing.
//!
//! Enables exercising the full ingestion pipeline without network access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted body streams

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};

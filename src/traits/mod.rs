//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - the streamed multipart upload the ingest client performs

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError};

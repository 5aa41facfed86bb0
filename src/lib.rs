//! Ingest client - upload a document and follow its streamed ingestion progress.
//!
//! The server answers an upload with a long-lived response body carrying one
//! `data: <json>` frame per line. This crate decodes that body incrementally,
//! hands each progress event to the caller and reduces the whole exchange to
//! a single [`IngestResult`] or [`IngestError`].
//!
//! This library exposes modules for use in integration tests and the `ingest` binary.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;

pub use client::IngestClient;
pub use config::ClientConfig;
pub use dispatcher::ProgressDispatcher;
pub use error::{ErrorKind, FrameError, IngestError};
pub use models::{EventKind, IngestResult, ProgressEvent, UploadFile};
pub use session::{IngestSession, SessionState};

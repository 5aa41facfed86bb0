//! Common test utilities for integration tests.
//!
//! Frame builders and a one-call helper that runs a full session against
//! a scripted transport.

#![allow(dead_code)]

use ingest_client::adapters::mock::{MockHttpClient, MockResponse};
use ingest_client::{ClientConfig, IngestClient, IngestError, IngestResult, ProgressEvent, UploadFile};

/// A `data:` line for `json`, newline-terminated.
pub fn frame(json: &str) -> String {
    format!("data: {}\n", json)
}

pub fn progress_frame(step: &str, message: &str) -> String {
    frame(&serde_json::json!({ "step": step, "message": message }).to_string())
}

pub fn done_frame(doc_id: &str, chunks: u64) -> String {
    frame(&serde_json::json!({ "step": "done", "message": "", "doc_id": doc_id, "chunks": chunks }).to_string())
}

pub fn error_frame(message: &str) -> String {
    progress_frame("error", message)
}

pub fn upload(filename: &str) -> UploadFile {
    UploadFile::new(filename, b"%PDF-1.7 test".to_vec())
}

/// Outcome of a session plus every event the callback saw.
pub struct Run {
    pub outcome: Result<IngestResult, IngestError>,
    pub events: Vec<ProgressEvent>,
    pub mock: MockHttpClient,
}

/// Run one ingestion of `filename` against `response`.
pub async fn run_session(filename: &str, response: MockResponse) -> Run {
    let mock = MockHttpClient::new();
    mock.set_default_response(response);
    let client = IngestClient::with_http(ClientConfig::default(), mock.clone());

    let mut events = Vec::new();
    let outcome = client
        .ingest_with_progress(&upload(filename), |event| events.push(event.clone()))
        .await;

    Run {
        outcome,
        events,
        mock,
    }
}

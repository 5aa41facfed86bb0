//! Error handling for streamed ingestion.
//!
//! Two separate types keep the recoverable and the fatal apart by construction:
//!
//! - [`FrameError`] - a `data:` payload that could not be decoded. Recovered
//!   locally by the frame parser; never reaches the caller.
//! - [`IngestError`] - everything that ends a session without a result.
//!
//! | Kind | Trigger | Propagation |
//! |------|---------|-------------|
//! | Transport | non-2xx status, connection or mid-body read failure | surfaced immediately |
//! | DecodeSkip | a `data:` frame that is not JSON, or has no string `step` | line dropped, loop continues |
//! | ServerReported | a `step == "error"` frame | surfaced, aborts consumption |
//! | Incomplete | stream ends without a qualifying `done` frame | surfaced at end-of-stream |

mod category;
mod frame;
mod ingest;

pub use category::ErrorKind;
pub use frame::FrameError;
pub use ingest::{IngestError, DEFAULT_SERVER_ERROR_MESSAGE, DEFAULT_TRANSPORT_MESSAGE};

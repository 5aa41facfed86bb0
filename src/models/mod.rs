mod progress;
mod upload;

pub use progress::{steps, EventKind, IngestResult, ProgressEvent};
pub use upload::UploadFile;

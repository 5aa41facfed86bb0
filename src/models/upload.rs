use bytes::Bytes;
use std::path::Path;

/// File name used when a path has no final component.
const FALLBACK_FILENAME: &str = "document";

/// A document to upload as the `file` field of the ingest form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    /// Name sent with the multipart part and echoed into the result
    pub filename: String,
    /// Raw file contents
    pub content: Bytes,
    /// Optional MIME type for the multipart part
    pub mime_type: Option<String>,
}

impl UploadFile {
    /// Create an upload from in-memory bytes.
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            mime_type: None,
        }
    }

    /// Set the MIME type sent with the file part.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file from disk, naming the upload after its final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
        Ok(Self::new(filename, content))
    }

    /// Size of the file contents in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the file has no contents.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_and_mime_type() {
        let file = UploadFile::new("report.pdf", b"%PDF".to_vec()).with_mime_type("application/pdf");
        assert_eq!(file.filename, "report.pdf");
        assert_eq!(file.len(), 4);
        assert!(!file.is_empty());
        assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"# Notes").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.filename, "notes.md");
        assert_eq!(file.content, Bytes::from_static(b"# Notes"));
        assert!(file.mime_type.is_none());
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadFile::from_path(dir.path().join("absent.txt")).await;
        assert!(result.is_err());
    }
}

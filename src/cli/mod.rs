//! CLI module for the `ingest` binary.
//!
//! # Usage
//!
//! ```ignore
//! use ingest_client::cli::{parse_args, run_ingest, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Ingest(args) => {
//!         let result = run_ingest(&args).await?;
//!         println!("{}", serde_json::to_string_pretty(&result)?);
//!     }
//!     CliCommand::Version | CliCommand::Help => { /* print and exit */ }
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, IngestArgs, USAGE};
pub use version::{version_line, VERSION};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use crate::client::IngestClient;
use crate::config::ClientConfig;
use crate::models::{IngestResult, ProgressEvent, UploadFile};

/// One progress line as printed on stderr.
pub fn format_progress(event: &ProgressEvent) -> String {
    if event.message.is_empty() {
        format!("[{}]", event.step)
    } else {
        format!("[{}] {}", event.step, event.message)
    }
}

/// Environment configuration with command-line overrides applied.
pub fn build_config(args: &IngestArgs) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &args.url {
        config = config.with_base_url(url.clone());
    }
    if let Some(key) = &args.api_key {
        config = config.with_api_key(key.clone());
    }
    config
}

/// Upload the file named in `args`, printing progress to stderr unless quiet.
pub async fn run_ingest(args: &IngestArgs) -> Result<IngestResult> {
    let file = UploadFile::from_path(&args.file)
        .await
        .wrap_err_with(|| format!("Failed to read {}", args.file.display()))?;

    let client = IngestClient::new(build_config(args))?;
    let quiet = args.quiet;
    let result = client
        .ingest_with_progress(&file, |event| {
            if !quiet {
                eprintln!("{}", format_progress(event));
            }
        })
        .await
        .wrap_err_with(|| format!("Ingestion of {} failed", file.filename))?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;

    #[test]
    fn test_format_progress() {
        assert_eq!(
            format_progress(&ProgressEvent::new("converting", "page 1/3")),
            "[converting] page 1/3"
        );
        assert_eq!(format_progress(&ProgressEvent::done("d1", 2)), "[done]");
    }

    #[test]
    #[serial]
    fn test_build_config_overrides_env() {
        std::env::set_var(crate::config::ENV_API_URL, "http://from-env:1");
        let args = IngestArgs {
            file: PathBuf::from("x"),
            url: Some("http://from-flag:2".to_string()),
            api_key: Some("flag-key".to_string()),
            quiet: false,
        };
        let config = build_config(&args);
        std::env::remove_var(crate::config::ENV_API_URL);

        assert_eq!(config.base_url, "http://from-flag:2");
        assert_eq!(config.api_key.as_deref(), Some("flag-key"));
    }

    #[tokio::test]
    async fn test_run_ingest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = IngestArgs {
            file: dir.path().join("missing.pdf"),
            url: Some("http://127.0.0.1:59999".to_string()),
            api_key: None,
            quiet: true,
        };
        let err = run_ingest(&args).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}

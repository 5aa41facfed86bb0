//! Command-line argument parsing for the ingest CLI.
//!
//! ```text
//! ingest <FILE> [--url <BASE_URL>] [--api-key <KEY>] [--quiet]
//! ```

use std::path::PathBuf;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: ingest <FILE> [--url <BASE_URL>] [--api-key <KEY>] [--quiet]

Upload FILE to the ingestion server and follow its progress.

Options:
  --url <BASE_URL>   Server base URL (env: INGEST_API_URL, default: http://localhost:8000)
  --api-key <KEY>    API key sent as X-API-Key (env: INGEST_API_KEY)
  -q, --quiet        Do not print progress lines
  -h, --help         Print this help
  -V, --version      Print the version";

/// Arguments of an ingest run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestArgs {
    /// Document to upload
    pub file: PathBuf,
    /// Overrides the configured base URL
    pub url: Option<String>,
    /// Overrides the configured API key
    pub api_key: Option<String>,
    /// Suppress progress output
    pub quiet: bool,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Upload a file (default)
    Ingest(IngestArgs),
}

/// Invalid command line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("missing <FILE> argument")]
    MissingFile,

    #[error("option {0} requires a value")]
    MissingValue(String),

    #[error("unexpected argument: {0}")]
    Unexpected(String),
}

/// Parse command-line arguments (program name first).
///
/// # Examples
///
/// ```
/// use ingest_client::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["ingest".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut file = None;
    let mut url = None;
    let mut api_key = None;
    let mut quiet = false;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--quiet" | "-q" => quiet = true,
            "--url" => url = Some(option_value(&mut args, &arg)?),
            "--api-key" => api_key = Some(option_value(&mut args, &arg)?),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(ArgsError::Unexpected(flag.to_string()));
            }
            _ if file.is_none() => file = Some(PathBuf::from(&arg)),
            _ => return Err(ArgsError::Unexpected(arg.clone())),
        }
    }

    let file = file.ok_or(ArgsError::MissingFile)?;
    Ok(CliCommand::Ingest(IngestArgs {
        file,
        url,
        api_key,
        quiet,
    }))
}

fn option_value<I>(args: &mut I, flag: &str) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}

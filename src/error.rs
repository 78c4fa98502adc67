//! Error taxonomy shared by the resolver, the converter and the batch runner.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Everything that can go wrong while turning a topic map into converted files.
///
/// Only [`ConvertError::ConversionFailed`] is recoverable: a batch logs it, skips
/// the document and moves on. Every other variant points at a broken setup
/// (missing tool, missing input tree, bad config) and aborts the run.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The external executable is not on the search path.
    #[error("{program} executable not found")]
    ToolNotFound { program: String },

    /// A source document does not exist on disk.
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A configuration document could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration document is not valid YAML or has the wrong shape.
    #[error("failed to parse {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// The topic map could not be read or parsed.
    #[error("invalid topic map {}: {message}", .path.display())]
    TopicMap { path: PathBuf, message: String },

    /// No extension script is known for the requested target format.
    #[error("target format {0} does not have a default converter file")]
    UnsupportedFormat(String),

    /// The configured extension script does not exist.
    #[error("converter file not found: {}", .0.display())]
    ExtensionScriptNotFound(PathBuf),

    /// The executable was located but could not be started.
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure outside of the external tool.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and exited unsuccessfully.
    #[error(
        "conversion of {} failed (exit code {}): {}",
        .source_file.display(),
        exit_code(.code),
        diagnostics(.stderr, .stdout)
    )]
    ConversionFailed {
        source_file: PathBuf,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl ConvertError {
    /// Whether a batch may skip the failing document and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ConvertError::ConversionFailed { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

fn diagnostics<'a>(stderr: &'a str, stdout: &'a str) -> &'a str {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        stdout.trim()
    } else {
        stderr
    }
}

//! Error types and exit codes for kabureport
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, missing credentials)
//! - 3: Data error (missing input file)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes reported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing input file (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during kabureport operations
///
/// Only the missing-input case aborts a run. Per-document and per-call
/// failures degrade in place and never surface as an `Err` from the
/// pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("missing API key (set GEMINI_API_KEY or api_key in kabureport.toml)")]
    MissingApiKey,

    // Data errors (exit code 3)
    #[error("input file not found: {path:?}")]
    InputNotFound { path: PathBuf },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl ReportError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ReportError::UnknownFormat(_)
            | ReportError::UsageError(_)
            | ReportError::MissingApiKey => ExitCode::Usage,

            ReportError::InputNotFound { .. } => ExitCode::Data,

            ReportError::Io(_)
            | ReportError::Json(_)
            | ReportError::Toml(_)
            | ReportError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            ReportError::UnknownFormat(_) => "unknown_format",
            ReportError::UsageError(_) => "usage_error",
            ReportError::MissingApiKey => "missing_api_key",
            ReportError::InputNotFound { .. } => "input_not_found",
            ReportError::Io(_) => "io_error",
            ReportError::Json(_) => "json_error",
            ReportError::Toml(_) => "toml_error",
            ReportError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for kabureport operations
pub type Result<T> = std::result::Result<T, ReportError>;

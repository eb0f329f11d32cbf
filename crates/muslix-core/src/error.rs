//! Error types and exit codes for muslix
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (missing store, invalid frontmatter, etc.)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the muslix CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, invalid frontmatter (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during muslix operations
#[derive(Error, Debug)]
pub enum MuslixError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("unknown algorithm: {0} (expected: jaccard, dice, cosine, or minhash)")]
    UnknownAlgorithm(String),

    #[error("{0}")]
    UsageError(String),

    // Data/store errors (exit code 3)
    #[error("store not found at {path:?}")]
    StoreNotFound { path: PathBuf },

    #[error("invalid store: {reason}")]
    InvalidStore { reason: String },

    #[error("note not found: {id}")]
    NoteNotFound { id: String },

    #[error("invalid frontmatter in {path:?}: {reason}")]
    InvalidFrontmatter { path: PathBuf, reason: String },

    #[error("tag not found: {title}")]
    TagNotFound { title: String },

    // Geodata lookup failures (exit code 1); the three variants stay
    // distinguishable for logging even though callers map them all to
    // per-note error outcomes.
    #[error("invalid postal code: {code} (expected exactly 5 digits)")]
    InvalidPostalCode { code: String },

    #[error("geodata network error: {reason}")]
    GeodataNetwork { reason: String },

    #[error("geodata service returned status {status}")]
    GeodataStatus { status: u16 },

    #[error("geodata response could not be parsed: {reason}")]
    GeodataParse { reason: String },

    // Apply-time escalation: aborts the batch with the note named
    #[error("failed to apply changes to note '{note_title}': {reason}")]
    ApplyFailed { note_title: String, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl MuslixError {
    /// Create an error for a failed operation
    pub fn failed(operation: &str, error: impl std::fmt::Display) -> Self {
        MuslixError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        MuslixError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an apply-time error carrying the failing note's title
    pub fn apply_failed(note_title: &str, error: impl std::fmt::Display) -> Self {
        MuslixError::ApplyFailed {
            note_title: note_title.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            // Usage errors
            MuslixError::UnknownFormat(_)
            | MuslixError::UnknownAlgorithm(_)
            | MuslixError::UsageError(_)
            | MuslixError::InvalidValue { .. } => ExitCode::Usage,

            // Data/store errors
            MuslixError::StoreNotFound { .. }
            | MuslixError::InvalidStore { .. }
            | MuslixError::NoteNotFound { .. }
            | MuslixError::InvalidFrontmatter { .. }
            | MuslixError::TagNotFound { .. } => ExitCode::Data,

            // Generic failures
            MuslixError::InvalidPostalCode { .. }
            | MuslixError::GeodataNetwork { .. }
            | MuslixError::GeodataStatus { .. }
            | MuslixError::GeodataParse { .. }
            | MuslixError::ApplyFailed { .. }
            | MuslixError::Io(_)
            | MuslixError::Yaml(_)
            | MuslixError::Json(_)
            | MuslixError::Toml(_)
            | MuslixError::FailedOperation { .. }
            | MuslixError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            MuslixError::UnknownFormat(_) => "unknown_format",
            MuslixError::UnknownAlgorithm(_) => "unknown_algorithm",
            MuslixError::UsageError(_) => "usage_error",
            MuslixError::StoreNotFound { .. } => "store_not_found",
            MuslixError::InvalidStore { .. } => "invalid_store",
            MuslixError::NoteNotFound { .. } => "note_not_found",
            MuslixError::InvalidFrontmatter { .. } => "invalid_frontmatter",
            MuslixError::TagNotFound { .. } => "tag_not_found",
            MuslixError::InvalidPostalCode { .. } => "invalid_postal_code",
            MuslixError::GeodataNetwork { .. } => "geodata_network",
            MuslixError::GeodataStatus { .. } => "geodata_status",
            MuslixError::GeodataParse { .. } => "geodata_parse",
            MuslixError::ApplyFailed { .. } => "apply_failed",
            MuslixError::Io(_) => "io_error",
            MuslixError::Yaml(_) => "yaml_error",
            MuslixError::Json(_) => "json_error",
            MuslixError::Toml(_) => "toml_error",
            MuslixError::InvalidValue { .. } => "invalid_value",
            MuslixError::FailedOperation { .. } => "failed_operation",
            MuslixError::Other(_) => "other",
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

    /// Whether this is a geodata lookup failure that maps to a per-note
    /// error outcome rather than aborting a batch.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            MuslixError::InvalidPostalCode { .. }
                | MuslixError::GeodataNetwork { .. }
                | MuslixError::GeodataStatus { .. }
                | MuslixError::GeodataParse { .. }
        )
    }
}

/// Result type alias for muslix operations
pub type Result<T> = std::result::Result<T, MuslixError>;

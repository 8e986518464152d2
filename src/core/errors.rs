//! Error types for the neardup-rs library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! structured [`NeardupError`]. Configuration, index-state and range errors
//! are reported synchronously to the caller and are never retried: every
//! computation here is deterministic and in-memory.

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// Main result type for neardup operations.
pub type Result<T> = std::result::Result<T, NeardupError>;

/// Error type for all neardup operations.
#[derive(Error, Debug)]
pub enum NeardupError {
    /// I/O related errors (reading workloads, config files)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors, e.g. a band count that does not divide the
    /// fingerprint width
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// A query was issued before the candidate index finished construction
    #[error("Index not built: cannot {operation} before the candidate index is built")]
    IndexNotBuilt {
        /// Operation that was attempted
        operation: String,
    },

    /// A negative document index, or one at or past the corpus length
    #[error("Document index {index} out of range{}", corpus_suffix(.len))]
    OutOfRange {
        /// Requested index, as supplied by the caller
        index: i128,
        /// Number of documents in the corpus, when known
        len: Option<usize>,
    },

    /// Malformed collaborator input (workload files, query lines)
    #[error("Parse error{}: {message}", line_suffix(.line))]
    Parse {
        /// Error description
        message: String,
        /// 1-based line number, when known
        line: Option<usize>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
        /// Expected value or format
        expected: Option<String>,
        /// Actual value received
        actual: Option<String>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },
}

fn corpus_suffix(len: &Option<usize>) -> String {
    match len {
        Some(len) => format!(" for corpus of {len} documents"),
        None => String::new(),
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {line}"),
        None => String::new(),
    }
}

impl NeardupError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an error for an operation attempted before the index exists
    pub fn index_not_built(operation: impl Into<String>) -> Self {
        Self::IndexNotBuilt {
            operation: operation.into(),
        }
    }

    /// Create an out-of-range error for a document index
    pub fn out_of_range(index: i128, len: usize) -> Self {
        Self::OutOfRange {
            index,
            len: Some(len),
        }
    }

    /// Create an out-of-range error for an index no corpus can hold
    /// (negative, or wider than `usize`)
    pub fn unaddressable_index(index: i128) -> Self {
        Self::OutOfRange { index, len: None }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            line: None,
        }
    }

    /// Create a new parse error at a 1-based line number
    pub fn parse_at(message: impl Into<String>, line: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line: Some(line),
        }
    }

    /// Create a validation error describing an expected/actual mismatch
    pub fn validation_mismatch(
        message: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Internal { context: ctx, .. } => {
                *ctx = Some(context.into());
            }
            Self::Io { message, .. }
            | Self::Serialization { message, .. }
            | Self::Parse { message, .. } => {
                *message = format!("{}: {message}", context.into());
            }
            _ => {}
        }
        self
    }

    /// Whether this error is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl From<io::Error> for NeardupError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for NeardupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for NeardupError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<ParseIntError> for NeardupError {
    fn from(err: ParseIntError) -> Self {
        Self::parse(format!("Invalid integer: {err}"))
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<NeardupError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}

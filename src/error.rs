use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for `gstconv` operations.
#[derive(Debug, Error)]
pub enum ConvError {
    /// Raised when a cleaned line does not carry one token per schema column.
    #[error(
        "line {line_number} has {found} fields but the schema declares {expected} columns: `{line}`"
    )]
    SchemaMismatch {
        /// One-based line number within the cleaned log.
        line_number: usize,
        /// Column count of the schema.
        expected: usize,
        /// Token count actually found on the line.
        found: usize,
        /// The offending line, trimmed.
        line: String,
    },

    /// Raised when a numeric column holds a token that does not parse as `f64`.
    #[error("line {line_number}: column `{column}` expects a number, found `{token}` in `{line}`")]
    TypeCoercion {
        /// One-based line number within the cleaned log.
        line_number: usize,
        column: String,
        token: String,
        line: String,
    },

    /// Raised when reading or writing a file or directory fails.
    #[error("filesystem error on `{}`: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised when a column schema is malformed.
    #[error("invalid column schema: {reason}")]
    InvalidSchema { reason: String },

    /// Raised when a column is looked up that the schema does not declare.
    #[error("column `{column}` is not part of the schema")]
    UnknownColumn { column: String },

    /// Raised when the chart backend fails.
    #[error("failed to render chart: {reason}")]
    Render { reason: String },

    /// Raised when a configuration file cannot be interpreted.
    #[error("invalid configuration in `{}`: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl ConvError {
    /// Helper to attach the offending path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Helper for schema validation failures.
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            reason: reason.into(),
        }
    }

    /// Helper for lookups of undeclared columns.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Helper for wrapping chart backend errors.
    pub fn render(reason: impl std::fmt::Display) -> Self {
        Self::Render {
            reason: reason.to_string(),
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, ConvError>;

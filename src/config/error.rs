//! Error types for configuration resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Setter-level failures are reported through this type and leave any
/// previously resolved value untouched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A path argument is not absolute or does not name an existing directory.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path
        path: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The current working directory could not be determined.
    #[error("Unable to get current directory name: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// Format value is neither `staging` nor a positive integer.
    #[error("Invalid format '{value}': expected 'staging' or a positive integer")]
    InvalidFormat {
        /// The rejected value
        value: String,
    },

    /// A default-value file is missing or unreadable.
    #[error("Unable to read data from '{}': {source}", path.display())]
    FileRead {
        /// Path to the default-value file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A default-value file exists but holds no data.
    #[error("Contents of '{}' are empty", path.display())]
    EmptyFile {
        /// Path to the default-value file
        path: PathBuf,
    },

    /// A mandatory setting could not be determined from any source.
    #[error("Unable to determine {field}. {hint}")]
    MissingRequired {
        /// Name of the missing setting
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The on-disk format id.
    pub const FORMAT: &str = "format id";
    /// The version server URL.
    pub const VERSION_URL: &str = "version URL";
    /// The content server URL.
    pub const CONTENT_URL: &str = "content URL";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a mandatory setting.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }

    /// Creates an `InvalidPath` error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

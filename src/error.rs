//! Global error handling for filemap
//!
//! This module provides a centralized error type that covers walking,
//! index resolution, flattening and the command-line front-end.

use std::io;
use thiserror::Error;

/// Global error type for filemap operations
#[derive(Error, Debug)]
pub enum FileMapError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A directory has no index file
    #[error("Directory '{0}' doesn't have an index file")]
    MissingIndexFile(String),

    /// The index file named for a directory does not exist
    #[error("Index file '{file}' not found in directory '{directory}'")]
    IndexFileNotFound { directory: String, file: String },

    /// The index entry of a directory is itself a directory
    #[error("Index file '{file}' in directory '{directory}' is not a file")]
    IndexFileIsDirectory { directory: String, file: String },

    /// Two entries of one directory ended up with the same name
    #[error("Name '{name}' is used by more than one entry in '{directory}'")]
    NameCollision { directory: String, name: String },

    /// A name transform produced an empty name
    #[error("Invalid name for '{0}': names must not be empty")]
    InvalidName(String),

    /// A flattened record points outside its array or disagrees with its parent
    #[error("Invalid flattened index: {0}")]
    InvalidIndex(String),

    /// File contents could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// The walk was cancelled through its cancel signal
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Specialized Result type for filemap operations
pub type Result<T> = std::result::Result<T, FileMapError>;

/// Creates a FileMapError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::FileMapError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// The binary returns io::Result from main
impl From<FileMapError> for io::Error {
    fn from(err: FileMapError) -> Self {
        match err {
            FileMapError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needs_positive(n: i32) -> Result<i32> {
        crate::ensure!(n > 0, Config, "expected a positive number, got {}", n);
        Ok(n)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(needs_positive(3).unwrap(), 3);
        let err = needs_positive(-1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: expected a positive number, got -1"
        );
    }

    #[test]
    fn test_io_error_round_trip_keeps_kind() {
        let err = FileMapError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let io_err: io::Error = FileMapError::Cancelled.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
    }
}

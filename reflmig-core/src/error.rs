//! Typed error handling for reflmig.
//!
//! Content problems (missing file, bad encoding, no declarations) are not
//! errors at all: they become skip outcomes. The variants here cover the
//! environment problems that library consumers need to match on.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reflmig operations.
#[derive(Error, Debug)]
pub enum ReflmigError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// File exists but is not valid UTF-8 text
    #[error("Encoding error at {path}: file is not valid UTF-8")]
    Encoding { path: PathBuf },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// No project root (a directory holding `Source/`) above the given path
    #[error("No project root found from {path} (expected a directory containing Source/)")]
    Root { path: PathBuf },

    /// A rewrite pattern failed to compile
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Path traversal or security error
    #[error("Security error: {message}")]
    Security { message: String },
}

impl ReflmigError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an encoding error.
    pub fn encoding(path: impl Into<PathBuf>) -> Self {
        Self::Encoding { path: path.into() }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a pattern error.
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a security error.
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the run can move on to the next file).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Encoding { path } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::Root { path } => Some(path),
            _ => None,
        }
    }
}

impl From<regex::Error> for ReflmigError {
    fn from(err: regex::Error) -> Self {
        Self::pattern(err.to_string())
    }
}

/// Convenience type alias for reflmig results.
pub type ReflmigResult<T> = Result<T, ReflmigError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ReflmigResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ReflmigResult<T> {
        self.map_err(|e| ReflmigError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = ReflmigError::io(
            PathBuf::from("/proj/Source/Foo.h"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ReflmigError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/proj/Source/Foo.h")));
        assert!(err.to_string().contains("/proj/Source/Foo.h"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ReflmigError::encoding("/Foo.h").is_recoverable());
        assert!(!ReflmigError::security("path traversal").is_recoverable());
        assert!(!ReflmigError::io(
            "/Foo.h",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full")
        )
        .is_recoverable());
    }

    #[test]
    fn test_regex_error_conversion() {
        let err: ReflmigError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, ReflmigError::Pattern { .. }));
        assert!(err.path().is_none());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let mapped = result.with_path("/missing/Foo.h");
        assert!(matches!(mapped, Err(ReflmigError::Io { .. })));
    }
}

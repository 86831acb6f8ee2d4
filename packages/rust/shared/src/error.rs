//! Error types for Bookstage.
//!
//! Library crates use [`BookstageError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.
//!
//! Every error here is fatal: a staging run is all-or-nothing, and any
//! failure aborts before the SUMMARY.md / meta.json outputs are written.

use std::path::PathBuf;

/// Top-level error type for all Bookstage operations.
#[derive(Debug, thiserror::Error)]
pub enum BookstageError {
    /// Configuration loading or pinned-version parsing error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Two registrations targeted the same local path. This indicates a bug
    /// in the staging plan, not a runtime condition.
    #[error("duplicate entry for {path}")]
    DuplicateEntry { path: String },

    /// Network failure, timeout, or a non-success HTTP status.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization error while emitting the manifest.
    #[error("json error: {0}")]
    Json(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BookstageError>;

impl BookstageError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a duplicate-entry error for a local path.
    pub fn duplicate(path: impl Into<String>) -> Self {
        Self::DuplicateEntry { path: path.into() }
    }

    /// Create a fetch error from any displayable message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BookstageError::config("missing [versions] section");
        assert_eq!(err.to_string(), "config error: missing [versions] section");

        let err = BookstageError::duplicate("typst/index.md");
        assert_eq!(err.to_string(), "duplicate entry for typst/index.md");

        let err = BookstageError::fetch("https://example.com: HTTP 404 Not Found");
        assert!(err.to_string().contains("HTTP 404"));
    }
}

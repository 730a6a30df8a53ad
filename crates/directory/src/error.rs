//! Error types for directory loading.
//!
//! Everything in this module is a load-time failure: once a snapshot cannot
//! be built, the run has nothing trustworthy to reconcile against and stops.
//! Errors carry a category so the CLI can print actionable advice.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for directory operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of directory errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Remote endpoint unreachable or returned a server error.
    Network,
    /// Credentials missing, expired or rejected.
    Auth,
    /// Response or export file could not be understood.
    Format,
    /// Snapshot data violates an invariant.
    Consistency,
    /// Local file access failed.
    Io,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Directory service unavailable",
            Self::Auth => "Authentication failed",
            Self::Format => "Unexpected directory data",
            Self::Consistency => "Inconsistent directory state",
            Self::Io => "File access failed",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check connectivity or proxy settings and run again",
            Self::Auth => "Refresh the access token and run again",
            Self::Format => "Verify the export file or API version matches what dirsync expects",
            Self::Consistency => "Fix the duplicated or missing entries at the source before syncing",
            Self::Io => "Check the configured paths and their permissions",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while loading a directory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// The provider rejected the request for another reason.
    #[error("directory provider error: {0}")]
    Provider(String),

    /// Response or export could not be parsed.
    #[error("invalid directory data: {0}")]
    InvalidData(String),

    /// A pagination cursor the provider does not recognise.
    #[error("invalid page cursor for {what}: {cursor}")]
    InvalidCursor {
        /// What was being listed.
        what: String,
        /// The offending cursor.
        cursor: String,
    },

    /// A key was marked loaded but its cache entry is missing.
    #[error("inconsistent cache state: {kind} '{key}' marked loaded but has no entry")]
    InconsistentCache {
        /// Which cache (group members, customer users).
        kind: &'static str,
        /// Cache key.
        key: String,
    },

    /// Two target groups carry the same correlation id.
    #[error("correlation id '{correlation_id}' is shared by groups {first} and {second}")]
    DuplicateCorrelation {
        /// The duplicated correlation id.
        correlation_id: String,
        /// First group id seen with it.
        first: String,
        /// Second group id seen with it.
        second: String,
    },

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http {
                status: Some(401 | 403),
                ..
            } => ErrorCategory::Auth,
            Error::Http { .. } | Error::Provider(_) => ErrorCategory::Network,
            Error::InvalidData(_) | Error::InvalidCursor { .. } => ErrorCategory::Format,
            Error::InconsistentCache { .. } | Error::DuplicateCorrelation { .. } => {
                ErrorCategory::Consistency
            }
            Error::Io { .. } => ErrorCategory::Io,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidData(err.to_string())
    }
}

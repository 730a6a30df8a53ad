//! Error types for the team API client.

use std::io;
use std::path::PathBuf;

/// Result type alias for team API calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the team API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// The API answered with an error status.
    #[error("{endpoint} failed with HTTP {status}: {summary}")]
    Api {
        /// Endpoint path, e.g. `team/members/list`.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// `error_summary` from the response body, or the raw body.
        summary: String,
    },

    /// Response body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// A looked-up entity does not exist on the team.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind ("group", "member").
        kind: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// No access token was configured.
    #[error("no team access token (set DIRSYNC_TEAM_TOKEN or [target] token_file)")]
    MissingToken,

    /// Proxy URL rejected.
    #[error("invalid proxy '{url}': {message}")]
    InvalidProxy {
        /// Configured proxy URL.
        url: String,
        /// Parser message.
        message: String,
    },

    /// IO error reading the token file.
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

    /// HTTP status attached to this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<Error> for directory::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Http { message, status } => Self::http(message, status),
            api @ Error::Api { .. } => {
                let status = api.status();
                Self::http(api.to_string(), status)
            }
            Error::InvalidResponse(message) => Self::InvalidData(message),
            Error::Io { path, source } => Self::io(path, source),
            other => Self::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory::ErrorCategory;

    #[test]
    fn test_status_code_conversion() {
        let err = Error::from(ureq::Error::StatusCode(503));
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "HTTP request failed: HTTP 503");
    }

    #[test]
    fn test_api_error_maps_to_auth_category() {
        let err = Error::Api {
            endpoint: "team/members/list".to_string(),
            status: 401,
            summary: "invalid_access_token/".to_string(),
        };
        let converted = directory::Error::from(err);
        assert_eq!(converted.category(), ErrorCategory::Auth);
        assert!(converted.to_string().contains("invalid_access_token"));
    }

    #[test]
    fn test_invalid_response_maps_to_format() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let converted = directory::Error::from(Error::from(json_err));
        assert_eq!(converted.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_not_found_maps_to_provider() {
        let converted = directory::Error::from(Error::NotFound {
            kind: "group",
            id: "g:1".to_string(),
        });
        assert_eq!(converted.to_string(), "directory provider error: group not found: g:1");
    }
}

//! Access token lookup.
//!
//! The token comes from `DIRSYNC_TEAM_TOKEN` when set, otherwise from a JSON
//! token file:
//!
//! ```json
//! {"token-team-management": "..."}
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Environment variable holding the team access token.
pub const TOKEN_ENV: &str = "DIRSYNC_TEAM_TOKEN";

#[derive(Debug, Deserialize)]
pub struct TokenFile {
    #[serde(rename = "token-team-management", default)]
    pub team_management: String,
}

/// Read the team management token from a token file.
pub fn read_token_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let file: TokenFile = serde_json::from_str(&content)?;
    let token = file.team_management.trim();
    if token.is_empty() {
        return Err(Error::MissingToken);
    }
    Ok(token.to_string())
}

/// Resolve the token from the environment, then the token file.
pub fn resolve_token(token_file: Option<&Path>) -> Result<String> {
    resolve_token_from(std::env::var(TOKEN_ENV).ok(), token_file)
}

fn resolve_token_from(env_token: Option<String>, token_file: Option<&Path>) -> Result<String> {
    if let Some(token) = env_token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        log::debug!("Using team token from {}", TOKEN_ENV);
        return Ok(token);
    }
    match token_file {
        Some(path) => {
            log::debug!("Using team token from {}", path.display());
            read_token_file(path)
        }
        None => Err(Error::MissingToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_token_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("team.json");
        fs::write(&path, r#"{"token-team-management": " abc123\n"}"#).unwrap();

        assert_eq!(read_token_file(&path).unwrap(), "abc123");
    }

    #[test]
    fn test_empty_token_is_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("team.json");
        fs::write(&path, r#"{"token-team-management": "  "}"#).unwrap();

        assert!(matches!(read_token_file(&path), Err(Error::MissingToken)));
    }

    #[test]
    fn test_malformed_token_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("team.json");
        fs::write(&path, "token=abc").unwrap();

        assert!(matches!(read_token_file(&path), Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_env_token_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("team.json");
        fs::write(&path, r#"{"token-team-management": "from-file"}"#).unwrap();

        let token = resolve_token_from(Some("from-env".to_string()), Some(&path)).unwrap();
        assert_eq!(token, "from-env");

        let token = resolve_token_from(Some(String::new()), Some(&path)).unwrap();
        assert_eq!(token, "from-file");
    }

    #[test]
    fn test_no_token_source() {
        assert!(matches!(resolve_token_from(None, None), Err(Error::MissingToken)));

        let missing = Path::new("/nonexistent/dirsync/team.json");
        assert!(matches!(resolve_token_from(None, Some(missing)), Err(Error::Io { .. })));
    }
}

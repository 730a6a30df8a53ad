//! Blocking RPC client for the team admin API.
//!
//! Every endpoint is a `POST {api_base}/2/{endpoint}` with a JSON argument
//! and a JSON result. Error statuses are read rather than raised by the
//! agent so the API's `error_summary` can be reported.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Production API host.
pub const DEFAULT_API_BASE: &str = "https://api.dropboxapi.com";

/// Team admin API client.
///
/// # Example
///
/// ```no_run
/// use directory::TargetDirectory;
/// use teamapi::TeamClient;
///
/// let client = TeamClient::new("token").with_proxy("http://proxy.internal:3128").unwrap();
/// let target = TargetDirectory::load(&client).unwrap();
/// println!("{} account(s)", target.accounts().len());
/// ```
pub struct TeamClient {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL, without trailing slash.
    api_base: String,
    token: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error_summary: String,
}

impl TeamClient {
    /// Create a client for the production API.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            agent: build_agent(None),
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
        }
    }

    /// Point the client at another host (for testing).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Route all requests through an HTTP(S) proxy.
    pub fn with_proxy(mut self, proxy_url: &str) -> Result<Self> {
        let proxy = ureq::Proxy::new(proxy_url).map_err(|e| Error::InvalidProxy {
            url: proxy_url.to_string(),
            message: e.to_string(),
        })?;
        self.agent = build_agent(Some(proxy));
        Ok(self)
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/2/{}", self.api_base, endpoint.trim_start_matches('/'))
    }

    /// Call one RPC endpoint.
    pub fn rpc<A, R>(&self, endpoint: &str, arg: &A) -> Result<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        log::trace!("POST {}", url);

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send_json(arg)?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(Error::Api {
                endpoint: endpoint.to_string(),
                status,
                summary: error_summary(&body),
            });
        }

        Ok(response.body_mut().read_json()?)
    }
}

impl fmt::Debug for TeamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeamClient")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn build_agent(proxy: Option<ureq::Proxy>) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .proxy(proxy)
        .build();
    ureq::Agent::new_with_config(config)
}

/// `error_summary` from an API error body, falling back to the raw text.
fn error_summary(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error_summary)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_base() {
        let client = TeamClient::new("t");
        assert_eq!(client.api_base(), "https://api.dropboxapi.com");
        assert_eq!(
            client.endpoint_url("team/members/list"),
            "https://api.dropboxapi.com/2/team/members/list"
        );
    }

    #[test]
    fn test_custom_api_base_trims_slashes() {
        let client = TeamClient::new("t").with_api_base("http://localhost:8080/");
        assert_eq!(
            client.endpoint_url("/team/groups/list/continue"),
            "http://localhost:8080/2/team/groups/list/continue"
        );
    }

    #[test]
    fn test_proxy_accepted() {
        let client = TeamClient::new("t").with_proxy("http://proxy.example.com:3128");
        assert!(client.is_ok());
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", TeamClient::new("secret-token"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_error_summary() {
        assert_eq!(
            error_summary(r#"{"error_summary": "id_not_found/..", "error": {}}"#),
            "id_not_found/.."
        );
        assert_eq!(error_summary("Error in call\n"), "Error in call");
    }
}

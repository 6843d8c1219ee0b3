//! Slack Web API client.
//!
//! [`SlackApiClient`] covers the two Web API methods the relay needs:
//! `auth.test` to verify the bot token at startup and
//! `apps.connections.open` to mint a Socket Mode WebSocket URL.

use reqwest::Client;
use tracing::debug;

use bullhorn_types::error::ChannelError;

use super::events::{AuthTestResponse, ConnectionsOpenResponse};

/// Base URL for the Slack Web API.
const SLACK_API_BASE: &str = "https://slack.com/api";

/// HTTP client for the Slack Web API.
///
/// Wraps a [`reqwest::Client`] and the bot token to provide typed
/// request methods. The base URL can be overridden for testing.
pub struct SlackApiClient {
    /// Shared HTTP client.
    http: Client,
    /// Bot token for API authorization.
    bot_token: String,
    /// Base URL for API calls.
    base_url: String,
}

impl SlackApiClient {
    /// Create a new client with the given bot token.
    pub fn new(bot_token: String) -> Self {
        Self {
            http: Client::new(),
            bot_token,
            base_url: SLACK_API_BASE.to_owned(),
        }
    }

    /// Create a client pointing at a custom base URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(bot_token: String, base_url: String) -> Self {
        Self {
            http: Client::new(),
            bot_token,
            base_url,
        }
    }

    /// Return the base URL used for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify the bot token by calling `auth.test`.
    ///
    /// Returns the authenticated user name on success.
    pub async fn auth_test(&self) -> Result<String, ChannelError> {
        let url = format!("{}/auth.test", self.base_url);

        debug!("calling auth.test");

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.bot_token))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let body: AuthTestResponse = resp
            .json()
            .await
            .map_err(|e| ChannelError::AuthFailed(e.to_string()))?;

        if !body.ok {
            let err_msg = body.error.unwrap_or_else(|| "unknown error".into());
            return Err(ChannelError::AuthFailed(format!("auth.test failed: {err_msg}")));
        }

        Ok(body.user.unwrap_or_default())
    }

    /// Call `apps.connections.open` to obtain a Socket Mode WebSocket URL.
    ///
    /// This endpoint requires the **app-level token** (`xapp-...`), not
    /// the bot token. The caller must supply the app token explicitly.
    pub async fn apps_connections_open(&self, app_token: &str) -> Result<String, ChannelError> {
        let url = format!("{}/apps.connections.open", self.base_url);

        debug!("calling apps.connections.open");

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {app_token}"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let body: ConnectionsOpenResponse = resp
            .json()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        if !body.ok {
            let err_msg = body.error.unwrap_or_else(|| "unknown error".into());
            return Err(ChannelError::AuthFailed(format!(
                "apps.connections.open failed: {err_msg}"
            )));
        }

        body.url.ok_or_else(|| {
            ChannelError::ConnectionFailed("apps.connections.open returned ok but no URL".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url() {
        let client = SlackApiClient::new("xoxb-test".into());
        assert_eq!(client.base_url(), "https://slack.com/api");
    }

    #[test]
    fn custom_base_url() {
        let client =
            SlackApiClient::with_base_url("xoxb-test".into(), "http://localhost:9999".into());
        assert_eq!(client.base_url(), "http://localhost:9999");
    }
}

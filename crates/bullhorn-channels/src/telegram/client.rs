//! HTTP client wrapper for the Telegram Bot API.
//!
//! [`TelegramClient`] provides typed methods for the subset of the
//! Telegram Bot API used by the relay: `getMe` and `sendMessage`. It
//! implements [`ChunkSender`] so the dispatcher can drive it without
//! knowing about HTTP.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use bullhorn_types::error::ChannelError;

use crate::dispatch::ChunkSender;

use super::types::{Message, SendMessageRequest, TelegramResponse, User};

/// HTTP client for the Telegram Bot API.
///
/// Wraps a [`reqwest::Client`] and the bot token to provide typed
/// request methods. The base URL can be overridden for testing.
pub struct TelegramClient {
    /// Bot token (kept for diagnostics; not logged).
    #[allow(dead_code)]
    token: String,
    /// Shared HTTP client.
    http: Client,
    /// Base URL: `https://api.telegram.org/bot{token}` by default.
    base_url: String,
}

impl TelegramClient {
    /// Create a new client with the given bot token.
    pub fn new(token: String) -> Self {
        let base_url = format!("https://api.telegram.org/bot{token}");
        Self {
            token,
            http: Client::new(),
            base_url,
        }
    }

    /// Create a client pointing at a custom base URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            token,
            http: Client::new(),
            base_url,
        }
    }

    /// Return the base URL used for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify the bot token by calling the `getMe` endpoint.
    ///
    /// Returns the bot's [`User`] info on success.
    pub async fn get_me(&self) -> Result<User, ChannelError> {
        let url = format!("{}/getMe", self.base_url);

        debug!("verifying bot token");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let body: TelegramResponse<User> = resp
            .json()
            .await
            .map_err(|e| ChannelError::AuthFailed(e.to_string()))?;

        if !body.ok {
            let desc = body.description.unwrap_or_else(|| "unauthorized".into());
            return Err(ChannelError::AuthFailed(desc));
        }

        body.result
            .ok_or_else(|| ChannelError::AuthFailed("missing result in response".into()))
    }

    /// Send an HTML-formatted message to a chat.
    ///
    /// If the API rejects the request (typically because the markup
    /// fails Telegram's parser), the text is re-sent once without a
    /// parse mode so the content still reaches the chat, unstyled.
    pub async fn send_html(&self, chat_id: &str, text: &str) -> Result<Message, ChannelError> {
        match self.send_with_mode(chat_id, text, Some("HTML")).await {
            Ok(msg) => Ok(msg),
            Err(ChannelError::SendFailed(desc)) => {
                warn!(chat_id, error = %desc, "HTML send rejected, retrying as plain text");
                self.send_with_mode(chat_id, text, None).await
            }
            Err(err) => Err(err),
        }
    }

    /// Send a message with the given parse mode (`None` for plain text).
    ///
    /// Returns the sent [`Message`] on success.
    async fn send_with_mode(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<Message, ChannelError> {
        let url = format!("{}/sendMessage", self.base_url);

        let req = SendMessageRequest {
            chat_id: chat_id.to_owned(),
            text: text.to_owned(),
            parse_mode: parse_mode.map(str::to_owned),
            disable_web_page_preview: true,
        };

        debug!(chat_id, parse_mode = parse_mode.unwrap_or("plain"), "sending message");

        let resp = self
            .http
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let body: TelegramResponse<Message> = resp
            .json()
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;

        if !body.ok {
            let desc = body.description.unwrap_or_else(|| "unknown error".into());
            return Err(ChannelError::SendFailed(desc));
        }

        body.result
            .ok_or_else(|| ChannelError::SendFailed("missing result in response".into()))
    }
}

#[async_trait]
impl ChunkSender for TelegramClient {
    async fn send(&self, destination: &str, markup: &str) -> Result<(), ChannelError> {
        self.send_html(destination, markup).await.map(|_| ())
    }
}

//! Telegram Bot API types for serialization.
//!
//! These types model the subset of the Telegram Bot API used by the
//! relay: `getMe` and `sendMessage`.

use serde::{Deserialize, Serialize};

/// Wrapper for all Telegram Bot API responses.
///
/// Every API method returns `{ ok: bool, result?: T, description?: String }`.
/// When `ok` is `false`, `description` contains the error message.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramResponse<T> {
    /// Whether the request was successful.
    pub ok: bool,
    /// The result payload, present when `ok` is `true`.
    pub result: Option<T>,
    /// Human-readable error description, present when `ok` is `false`.
    pub description: Option<String>,
}

/// A Telegram user or bot, as returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Whether this user is a bot.
    pub is_bot: bool,
    /// User's first name (the bot's display name).
    pub first_name: String,
    /// Username without the leading `@`, if set.
    pub username: Option<String>,
}

/// The sent message, as returned by `sendMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Unique message identifier within the chat.
    pub message_id: i64,
}

/// Request body for the `sendMessage` API method.
///
/// `chat_id` is a string so both numeric group IDs and `@channel`
/// handles work unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    /// Target chat identifier or `@channelusername`.
    pub chat_id: String,
    /// Text of the message to send.
    pub text: String,
    /// Parse mode for formatting; omitted for plain text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    /// Suppress link previews -- campaign messages are link-heavy.
    pub disable_web_page_preview: bool,
}

//! Slack Socket Mode and Events API types.
//!
//! These types model the Socket Mode envelope format and the inner
//! message event payload, including the Block Kit `blocks` array and the
//! message metadata that carries the campaign event type.

use serde::{Deserialize, Serialize};

use super::blocks::SlackBlock;

/// A Socket Mode envelope wrapping an event from Slack.
///
/// Each message over the Socket Mode WebSocket carries an `envelope_id`
/// that must be acknowledged.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackEnvelope {
    /// The type of envelope: `"events_api"`, `"interactive"`, `"slash_commands"`.
    #[serde(rename = "type")]
    pub envelope_type: String,

    /// Unique ID for this envelope; must be acknowledged.
    pub envelope_id: String,

    /// Whether Slack expects a response payload in the acknowledgement.
    #[serde(default)]
    pub accepts_response_payload: bool,

    /// The event payload (for `events_api` type envelopes).
    pub payload: Option<SlackEventPayload>,
}

/// The payload inside an `events_api` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackEventPayload {
    /// The team/workspace ID.
    pub team_id: Option<String>,

    /// The inner event object.
    pub event: Option<SlackEvent>,

    /// The event type at the top level (e.g., `"event_callback"`).
    #[serde(rename = "type")]
    pub payload_type: Option<String>,
}

/// An inner Slack message event.
///
/// Campaign posts arrive as `message` events carrying Block Kit `blocks`
/// and a `metadata.event_type` that identifies the campaign pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackEvent {
    /// Event type: `"message"`, `"app_mention"`, etc.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Channel/conversation ID where the event occurred.
    pub channel: Option<String>,

    /// User ID who posted, if the message came from a user.
    pub user: Option<String>,

    /// Plain-text fallback content of the message.
    pub text: Option<String>,

    /// Timestamp of the message (unique message ID within a channel).
    pub ts: Option<String>,

    /// Bot ID, if the message was posted by a bot or workflow.
    pub bot_id: Option<String>,

    /// Block Kit blocks, when the message has structured content.
    #[serde(default)]
    pub blocks: Vec<SlackBlock>,

    /// Message metadata attached by the posting workflow.
    pub metadata: Option<SlackMetadata>,
}

/// Message metadata, as attached via `chat.postMessage`'s `metadata` field.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackMetadata {
    /// The workflow-defined event type, e.g. `"MARKETING_CAMPAIGN_SENT"`.
    pub event_type: Option<String>,
}

/// Acknowledgement response sent back to Slack over the WebSocket.
///
/// Every envelope must be acknowledged by sending back its `envelope_id`.
#[derive(Debug, Clone, Serialize)]
pub struct SlackAcknowledge {
    /// The envelope ID being acknowledged.
    pub envelope_id: String,

    /// Optional response payload (usually omitted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

/// Response from the `auth.test` API call.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTestResponse {
    /// Whether the API call succeeded.
    pub ok: bool,

    /// Authenticated user name.
    pub user: Option<String>,

    /// Workspace name.
    pub team: Option<String>,

    /// Error message if `ok` is `false`.
    pub error: Option<String>,
}

/// Response from the `apps.connections.open` API call.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionsOpenResponse {
    /// Whether the API call succeeded.
    pub ok: bool,

    /// The WebSocket URL to connect to.
    pub url: Option<String>,

    /// Error message if `ok` is `false`.
    pub error: Option<String>,
}

//! The Socket Mode listener loop and campaign message filter.
//!
//! [`SlackListener`] holds a reconnecting WebSocket connection open,
//! acknowledges every envelope, and hands qualifying campaign messages
//! to a [`CampaignHandler`]. A handler failure is logged and the loop
//! keeps running; one bad message never takes the relay down.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use bullhorn_types::config::SlackConfig;
use bullhorn_types::error::ChannelError;
use bullhorn_types::rich_text::CampaignMessage;

use super::api::SlackApiClient;
use super::blocks;
use super::events::{SlackAcknowledge, SlackEnvelope, SlackEvent};
use super::mrkdwn;

/// Delay before retrying after a WebSocket connection failure.
const RECONNECT_DELAY_SECS: u64 = 5;

/// Consumer of qualifying campaign messages.
///
/// The listener calls this once per message, awaiting completion before
/// reading the next event.
#[async_trait]
pub trait CampaignHandler: Send + Sync {
    /// Process one campaign message end to end.
    async fn handle(&self, message: CampaignMessage) -> Result<(), ChannelError>;
}

/// Socket Mode listener for a single source channel.
pub struct SlackListener {
    /// Slack Web API client (for `auth.test` and connection minting).
    api: SlackApiClient,
    /// App-level token for Socket Mode connection.
    app_token: String,
    /// The one channel whose messages are relayed.
    channel_id: String,
    /// Metadata event-type prefix that marks a campaign message.
    campaign_prefix: String,
}

impl SlackListener {
    /// Create a listener from configuration.
    pub fn new(config: &SlackConfig) -> Self {
        Self {
            api: SlackApiClient::new(config.bot_token.clone()),
            app_token: config.app_token.clone(),
            channel_id: config.channel_id.clone(),
            campaign_prefix: config.campaign_prefix.clone(),
        }
    }

    /// Verify the bot token against the Web API.
    ///
    /// Returns the authenticated user name.
    pub async fn verify(&self) -> Result<String, ChannelError> {
        self.api.auth_test().await
    }

    /// Whether an event is a campaign message from the watched channel.
    fn qualifies(&self, event: &SlackEvent) -> bool {
        if event.event_type != "message" {
            return false;
        }
        if event.channel.as_deref() != Some(self.channel_id.as_str()) {
            return false;
        }
        event
            .metadata
            .as_ref()
            .and_then(|m| m.event_type.as_deref())
            .is_some_and(|t| t.starts_with(&self.campaign_prefix))
    }

    /// Build a [`CampaignMessage`] from an event's structured content.
    ///
    /// Block Kit blocks are preferred; a message without usable blocks
    /// falls back to parsing the plain mrkdwn text field.
    fn extract(event: &SlackEvent) -> CampaignMessage {
        let mut nodes = blocks::blocks_to_nodes(&event.blocks);
        let fallback = event.text.clone().unwrap_or_default();
        if nodes.is_empty() && !fallback.is_empty() {
            nodes = mrkdwn::parse(&fallback);
        }
        CampaignMessage { nodes, fallback }
    }

    /// Process a single Socket Mode envelope, handing any qualifying
    /// campaign message to the handler.
    pub(crate) async fn process_envelope(
        &self,
        envelope: &SlackEnvelope,
        handler: &Arc<dyn CampaignHandler>,
    ) -> Result<(), ChannelError> {
        // Only process events_api envelopes.
        if envelope.envelope_type != "events_api" {
            debug!(
                envelope_type = %envelope.envelope_type,
                "skipping non-events_api envelope"
            );
            return Ok(());
        }

        let Some(ref payload) = envelope.payload else {
            return Ok(());
        };

        let Some(ref event) = payload.event else {
            return Ok(());
        };

        if !self.qualifies(event) {
            debug!(
                event_type = %event.event_type,
                channel = event.channel.as_deref().unwrap_or_default(),
                "skipping non-campaign event"
            );
            return Ok(());
        }

        let message = Self::extract(event);
        if message.nodes.is_empty() && message.fallback.is_empty() {
            debug!("campaign message has no content, skipping");
            return Ok(());
        }

        info!(
            ts = event.ts.as_deref().unwrap_or_default(),
            nodes = message.nodes.len(),
            "forwarding campaign message"
        );

        handler.handle(message).await
    }

    /// Run the listener until `cancel` fires.
    ///
    /// Obtains a fresh WebSocket URL for every connection attempt and
    /// reconnects after a fixed delay when the connection drops.
    pub async fn run(
        &self,
        handler: Arc<dyn CampaignHandler>,
        cancel: CancellationToken,
    ) -> Result<(), ChannelError> {
        info!(channel = %self.channel_id, "listener starting in Socket Mode");

        // Main reconnection loop.
        loop {
            // Obtain a WebSocket URL.
            let ws_url = match self.api.apps_connections_open(&self.app_token).await {
                Ok(url) => url,
                Err(e) => {
                    error!(error = %e, "failed to obtain WebSocket URL");

                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(
                            std::time::Duration::from_secs(RECONNECT_DELAY_SECS)
                        ) => continue,
                    }
                }
            };

            // Connect to WebSocket.
            let ws_stream = match tokio_tungstenite::connect_async(&ws_url).await {
                Ok((stream, _)) => stream,
                Err(e) => {
                    error!(error = %e, "failed to connect WebSocket");

                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(
                            std::time::Duration::from_secs(RECONNECT_DELAY_SECS)
                        ) => continue,
                    }
                }
            };

            info!("WebSocket connected");

            let (mut ws_write, mut ws_read) = ws_stream.split();

            // Message processing loop for this connection.
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("listener received cancellation");
                        // Close the WebSocket gracefully.
                        let _ = ws_write.close().await;
                        return Ok(());
                    }
                    msg = ws_read.next() => {
                        match msg {
                            Some(Ok(WsMessage::Text(text))) => {
                                // Try to parse as an envelope.
                                match serde_json::from_str::<SlackEnvelope>(&text) {
                                    Ok(envelope) => {
                                        // Acknowledge the envelope.
                                        let ack = SlackAcknowledge {
                                            envelope_id: envelope.envelope_id.clone(),
                                            payload: None,
                                        };
                                        if let Ok(ack_json) = serde_json::to_string(&ack) {
                                            if let Err(e) = ws_write
                                                .send(WsMessage::Text(ack_json))
                                                .await
                                            {
                                                warn!(
                                                    error = %e,
                                                    "failed to send acknowledge"
                                                );
                                            }
                                        }

                                        // Process the event.
                                        if let Err(e) =
                                            self.process_envelope(&envelope, &handler).await
                                        {
                                            error!(
                                                error = %e,
                                                "failed to forward campaign message"
                                            );
                                        }
                                    }
                                    Err(_) => {
                                        // May be a hello or disconnect message.
                                        debug!(raw = %text, "received non-envelope message");
                                    }
                                }
                            }
                            Some(Ok(WsMessage::Close(_))) => {
                                info!("WebSocket closed by server");
                                break;
                            }
                            Some(Ok(WsMessage::Ping(data))) => {
                                let _ = ws_write.send(WsMessage::Pong(data)).await;
                            }
                            Some(Err(e)) => {
                                error!(error = %e, "WebSocket error");
                                break;
                            }
                            None => {
                                info!("WebSocket stream ended");
                                break;
                            }
                            _ => {} // Binary, Pong, Frame -- ignore
                        }
                    }
                }
            }

            // If we get here, the connection dropped. Reconnect unless
            // cancellation was requested.
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(
                    std::time::Duration::from_secs(RECONNECT_DELAY_SECS)
                ) => {
                    info!("reconnecting WebSocket...");
                }
            }
        }

        info!("listener stopped");
        Ok(())
    }
}

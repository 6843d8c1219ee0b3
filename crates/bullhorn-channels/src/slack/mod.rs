//! Slack Socket Mode ingestion.
//!
//! The listener connects to Slack over a Socket Mode WebSocket, filters
//! incoming events down to qualifying campaign messages, and maps the
//! platform's Block Kit payload into the shared
//! [`RichTextNode`](bullhorn_types::rich_text::RichTextNode) tree.
//!
//! # Modules
//!
//! - [`api`] -- Web API client (`apps.connections.open`)
//! - [`events`] -- Socket Mode envelope and event payload types
//! - [`blocks`] -- Block Kit to rich-text tree mapping
//! - [`mrkdwn`] -- fallback parser for the plain mrkdwn text field
//! - [`listener`] -- the reconnecting WebSocket loop and message filter

pub mod api;
pub mod blocks;
pub mod events;
pub mod listener;
pub mod mrkdwn;

pub use listener::{CampaignHandler, SlackListener};

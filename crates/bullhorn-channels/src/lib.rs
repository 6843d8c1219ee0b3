//! Platform collaborators and delivery dispatch for bullhorn.
//!
//! The rendering pipeline in `bullhorn-render` is pure; everything that
//! touches the network lives here:
//!
//! - [`slack`] -- Socket Mode ingestion: receives events, filters for
//!   qualifying campaign messages, and maps the platform's block format
//!   into the shared rich-text tree
//! - [`telegram`] -- the send collaborator: a typed Bot API client that
//!   delivers one markup chunk per call
//! - [`dispatch`] -- fans chunks out to every configured destination with
//!   per-destination failure isolation
//!
//! # Error handling
//!
//! Transport operations return
//! [`ChannelError`](bullhorn_types::error::ChannelError); the dispatcher
//! records per-destination failures as [`DeliveryOutcome`]s instead of
//! raising them.

pub mod dispatch;
pub mod slack;
pub mod telegram;

pub use dispatch::{ChunkSender, DeliveryOutcome, Dispatcher};
pub use slack::{CampaignHandler, SlackListener};
pub use telegram::TelegramClient;

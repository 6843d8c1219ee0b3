//! Shared types for the bullhorn campaign relay.
//!
//! This crate carries the data model that flows through the pipeline:
//!
//! - [`rich_text`] -- the structured message tree delivered by ingestion
//! - [`config`] -- process-wide configuration, loaded once at startup
//! - [`error`] -- the error taxonomy shared by all crates
//!
//! It performs no I/O and has no async surface, so every other crate in
//! the workspace can depend on it freely.

pub mod config;
pub mod error;
pub mod rich_text;

pub use config::Config;
pub use error::{BullhornError, ChannelError, SegmentError};
pub use rich_text::{CampaignMessage, RichTextNode, StyleFlags};

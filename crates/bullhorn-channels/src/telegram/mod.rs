//! Telegram delivery collaborator.
//!
//! Provides the typed Bot API client that implements
//! [`ChunkSender`](crate::dispatch::ChunkSender) for the dispatcher.
//!
//! # Modules
//!
//! - [`types`] -- Bot API request/response types
//! - [`client`] -- HTTP client wrapper and the `ChunkSender` impl

pub mod client;
pub mod types;

pub use client::TelegramClient;

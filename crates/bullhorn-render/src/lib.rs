//! Rich-text to Telegram HTML rendering and chunking.
//!
//! The pipeline in this crate is a pure transformation over immutable
//! inputs, safe to run on any thread:
//!
//! ```text
//! Vec<RichTextNode> ──render()──> RenderedDocument ──segment()──> Vec<String>
//! ```
//!
//! - [`escape`] -- reserved-character escaping for Telegram's HTML subset
//! - [`inline`] -- styled runs and links to tag-wrapped spans
//! - [`block`] -- the recursive block-tree walk producing a [`RenderedDocument`]
//! - [`segment`] -- length-aware splitting into tag-balanced chunks
//!
//! Rendering performs no length checks; length policy lives entirely in
//! [`segment`] so the two remain independently testable.

pub mod block;
pub mod emoji;
pub mod escape;
pub mod inline;
pub mod segment;

pub use block::{RenderedDocument, render};
pub use segment::segment;

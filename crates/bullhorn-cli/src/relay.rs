//! The end-to-end forwarding pipeline.
//!
//! [`Forwarder`] glues the pure rendering stages to the delivery
//! dispatcher: render the tree, segment the markup, fan the chunks out.
//! It implements [`CampaignHandler`] so the Socket Mode listener can
//! drive it without knowing about Telegram.

use async_trait::async_trait;
use tracing::{info, warn};

use bullhorn_channels::dispatch::{ChunkSender, Dispatcher};
use bullhorn_channels::slack::CampaignHandler;
use bullhorn_render::{render, segment};
use bullhorn_types::error::ChannelError;
use bullhorn_types::rich_text::CampaignMessage;

/// Renders, segments, and dispatches one campaign message at a time.
pub struct Forwarder<S: ChunkSender> {
    /// The chunk delivery collaborator.
    sender: S,
    /// Fan-out over the configured destinations.
    dispatcher: Dispatcher,
    /// Maximum chunk length, in Unicode scalar values.
    chunk_limit: usize,
}

impl<S: ChunkSender> Forwarder<S> {
    /// Create a forwarder over the given sender and destination set.
    pub fn new(sender: S, dispatcher: Dispatcher, chunk_limit: usize) -> Self {
        Self {
            sender,
            dispatcher,
            chunk_limit,
        }
    }
}

#[async_trait]
impl<S: ChunkSender> CampaignHandler for Forwarder<S> {
    async fn handle(&self, message: CampaignMessage) -> Result<(), ChannelError> {
        let doc = render(&message.nodes);
        if doc.is_empty() {
            info!("rendered document is empty, nothing to forward");
            return Ok(());
        }

        let chunks =
            segment(&doc, self.chunk_limit).map_err(|e| ChannelError::Other(e.to_string()))?;

        let outcomes = self
            .dispatcher
            .dispatch(&self.sender, &chunks)
            .await
            .map_err(|e| ChannelError::Other(e.to_string()))?;

        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        for outcome in &outcomes {
            if let Some(ref error) = outcome.error {
                warn!(
                    destination = %outcome.destination,
                    chunk_index = outcome.chunk_index,
                    error = %error,
                    "chunk was not delivered"
                );
            }
        }

        info!(
            chunks = chunks.len(),
            destinations = self.dispatcher.destinations().len(),
            failed,
            "campaign message forwarded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bullhorn_types::rich_text::RichTextNode;

    use super::*;

    /// Sender that records deliveries, optionally failing one destination.
    struct MockSender {
        sent: Mutex<Vec<(String, String)>>,
        failing: Option<String>,
    }

    impl MockSender {
        fn new(failing: Option<&str>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                failing: failing.map(str::to_owned),
            }
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChunkSender for MockSender {
        async fn send(&self, destination: &str, markup: &str) -> Result<(), ChannelError> {
            self.sent
                .lock()
                .unwrap()
                .push((destination.to_owned(), markup.to_owned()));
            if self.failing.as_deref() == Some(destination) {
                return Err(ChannelError::SendFailed("unreachable".into()));
            }
            Ok(())
        }
    }

    fn forwarder(failing: Option<&str>, limit: usize) -> Forwarder<MockSender> {
        Forwarder::new(
            MockSender::new(failing),
            Dispatcher::new(vec!["A".into(), "B".into()]),
            limit,
        )
    }

    fn message(nodes: Vec<RichTextNode>) -> CampaignMessage {
        CampaignMessage {
            nodes,
            fallback: String::new(),
        }
    }

    #[tokio::test]
    async fn renders_and_delivers_to_every_destination() {
        let fwd = forwarder(None, 4096);
        fwd.handle(message(vec![RichTextNode::Header {
            text: "Launch".into(),
        }]))
        .await
        .unwrap();

        let sent = fwd.sender.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|(_, markup)| markup == "<b>Launch</b>"));
        assert!(sent.iter().any(|(dest, _)| dest == "A"));
        assert!(sent.iter().any(|(dest, _)| dest == "B"));
    }

    #[tokio::test]
    async fn empty_message_sends_nothing() {
        let fwd = forwarder(None, 4096);
        fwd.handle(message(vec![])).await.unwrap();
        assert!(fwd.sender.sent().is_empty());
    }

    #[tokio::test]
    async fn long_message_is_split_before_sending() {
        let fwd = forwarder(None, 32);
        let long = "word ".repeat(20).trim_end().to_owned();
        fwd.handle(message(vec![RichTextNode::Section {
            children: vec![RichTextNode::text(long)],
        }]))
        .await
        .unwrap();

        let sent = fwd.sender.sent();
        let to_a = sent.iter().filter(|(dest, _)| dest == "A").count();
        assert!(to_a > 1, "expected multiple chunks, got {to_a}");
        assert!(sent.iter().all(|(_, markup)| markup.chars().count() <= 32));
    }

    #[tokio::test]
    async fn partial_failure_is_not_an_error() {
        let fwd = forwarder(Some("A"), 4096);
        fwd.handle(message(vec![RichTextNode::Section {
            children: vec![RichTextNode::text("hello")],
        }]))
        .await
        .unwrap();

        // B still got the chunk even though A failed.
        let sent = fwd.sender.sent();
        assert!(sent.iter().any(|(dest, _)| dest == "B"));
    }

    #[tokio::test]
    async fn unworkable_chunk_limit_is_reported() {
        let fwd = forwarder(None, 3);
        let err = fwd
            .handle(message(vec![RichTextNode::Preformatted {
                text: "code".into(),
            }]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains('3'));
        assert!(fwd.sender.sent().is_empty());
    }
}

//! Delivery dispatch: fan chunks out to every configured destination.
//!
//! Destinations are independent and proceed concurrently; within one
//! destination chunks are sent strictly in order, and the first failure
//! stops that destination only. Partial failure is a first-class result
//! (a list of [`DeliveryOutcome`]s), not exception-driven control flow,
//! so the caller can inspect exactly what reached whom.

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use bullhorn_types::error::{BullhornError, ChannelError};

/// The external send collaborator.
///
/// One call delivers one markup chunk to one destination. The
/// implementation owns authentication, the network call, and mapping
/// transport errors to [`ChannelError`]; the chunk is guaranteed to be
/// within the platform limit by the segmenter's contract.
#[async_trait]
pub trait ChunkSender: Send + Sync {
    /// Send `markup` to the destination identified by `destination`.
    async fn send(&self, destination: &str, markup: &str) -> Result<(), ChannelError>;
}

/// The result of one attempted (chunk, destination) send.
///
/// Transient: created during dispatch, consumed by the caller for
/// logging, discarded after reporting.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    /// Opaque destination identifier.
    pub destination: String,
    /// Zero-based index of the chunk within the message.
    pub chunk_index: usize,
    /// The error encountered, or `None` on success.
    pub error: Option<String>,
}

impl DeliveryOutcome {
    /// True when the send succeeded.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Fans ordered chunks out to a fixed destination list.
///
/// The destination list is process-wide configuration: loaded once at
/// startup, read-only thereafter.
pub struct Dispatcher {
    destinations: Vec<String>,
}

impl Dispatcher {
    /// Create a dispatcher for the given destination list.
    pub fn new(destinations: Vec<String>) -> Self {
        Self { destinations }
    }

    /// The configured destinations, in dispatch order.
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    /// Deliver `chunks`, in order, to every destination.
    ///
    /// Destinations run concurrently; chunk order within each
    /// destination is preserved by awaiting each send before the next.
    /// A failed send records an outcome and skips that destination's
    /// remaining chunks without affecting any other destination.
    ///
    /// # Errors
    ///
    /// [`BullhornError::NoDestinations`] when the destination list is
    /// empty -- dispatch must not silently no-op.
    pub async fn dispatch(
        &self,
        sender: &dyn ChunkSender,
        chunks: &[String],
    ) -> Result<Vec<DeliveryOutcome>, BullhornError> {
        if self.destinations.is_empty() {
            return Err(BullhornError::NoDestinations);
        }

        let deliveries = self
            .destinations
            .iter()
            .map(|destination| deliver_to(sender, destination, chunks));

        let per_destination = join_all(deliveries).await;
        Ok(per_destination.into_iter().flatten().collect())
    }
}

/// Send every chunk to one destination, stopping at the first failure.
async fn deliver_to(
    sender: &dyn ChunkSender,
    destination: &str,
    chunks: &[String],
) -> Vec<DeliveryOutcome> {
    let mut outcomes = Vec::with_capacity(chunks.len());

    for (chunk_index, chunk) in chunks.iter().enumerate() {
        match sender.send(destination, chunk).await {
            Ok(()) => {
                debug!(destination, chunk_index, "chunk delivered");
                outcomes.push(DeliveryOutcome {
                    destination: destination.to_owned(),
                    chunk_index,
                    error: None,
                });
            }
            Err(err) => {
                warn!(
                    destination,
                    chunk_index,
                    error = %err,
                    "delivery failed, skipping remaining chunks for this destination"
                );
                outcomes.push(DeliveryOutcome {
                    destination: destination.to_owned(),
                    chunk_index,
                    error: Some(err.to_string()),
                });
                break;
            }
        }
    }

    outcomes
}

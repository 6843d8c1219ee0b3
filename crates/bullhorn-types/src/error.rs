//! Error types for the bullhorn relay.
//!
//! Provides [`BullhornError`] as the top-level error type, [`SegmentError`]
//! for chunking failures, and [`ChannelError`] for transport failures.
//! All are non-exhaustive to allow future extension without breaking
//! downstream.

use thiserror::Error;

/// Top-level error type for the relay.
///
/// Everything here is fatal for the operation that raised it: bad
/// configuration aborts startup, a segmentation failure drops that one
/// message. Per-destination delivery failures are *not* errors -- they
/// are recorded as outcomes by the dispatcher and never raised.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BullhornError {
    /// Configuration is missing required fields or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Dispatch was requested with an empty destination list.
    #[error("no destinations configured")]
    NoDestinations,

    /// The message could not be split into chunks under the limit.
    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// A channel-layer error bubbled up.
    #[error("channel error: {0}")]
    Channel(String),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Chunking failure raised by the length-aware segmenter.
///
/// Fatal for the message being processed, never silently dropped: the
/// caller decides whether to log and skip or abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SegmentError {
    /// The configured limit is too small to fit even a single character
    /// plus the tag overhead of the current span.
    #[error("chunk limit {limit} too small to fit any content")]
    LimitTooSmall {
        /// The limit that was in effect.
        limit: usize,
    },
}

/// Transport-layer error type.
///
/// Used by the Slack listener and the Telegram client to report failures
/// in connecting, authenticating, or exchanging messages.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChannelError {
    /// Failed to establish a connection to the channel backend.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication / authorization was rejected.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Sending a message failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receiving a message failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Catch-all for errors that do not fit other variants.
    #[error("{0}")]
    Other(String),
}

impl From<ChannelError> for BullhornError {
    fn from(err: ChannelError) -> Self {
        BullhornError::Channel(err.to_string())
    }
}

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BullhornError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_invalid_display() {
        let err = BullhornError::ConfigInvalid {
            reason: "missing SLACK_BOT_TOKEN".into(),
        };
        assert_eq!(err.to_string(), "invalid config: missing SLACK_BOT_TOKEN");
    }

    #[test]
    fn no_destinations_display() {
        assert_eq!(
            BullhornError::NoDestinations.to_string(),
            "no destinations configured"
        );
    }

    #[test]
    fn segment_error_converts_transparently() {
        let err: BullhornError = SegmentError::LimitTooSmall { limit: 3 }.into();
        assert_eq!(err.to_string(), "chunk limit 3 too small to fit any content");
    }

    #[test]
    fn channel_error_display() {
        let err = ChannelError::SendFailed("chat not found".into());
        assert_eq!(err.to_string(), "send failed: chat not found");

        let err = ChannelError::AuthFailed("bad token".into());
        assert_eq!(err.to_string(), "authentication failed: bad token");
    }

    #[test]
    fn channel_error_into_bullhorn() {
        let err: BullhornError = ChannelError::ConnectionFailed("refused".into()).into();
        assert!(matches!(err, BullhornError::Channel(_)));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn bullhorn_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BullhornError = io_err.into();
        assert!(matches!(err, BullhornError::Io(_)));
    }

    #[test]
    fn bullhorn_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: BullhornError = json_err.into();
        assert!(matches!(err, BullhornError::Json(_)));
    }
}

//! Configuration schema and loading.
//!
//! The relay reads a JSON config file (default `~/.bullhorn/config.json`)
//! and applies environment-variable overrides for secrets, so a bare
//! deployment can run from env vars alone. The loaded [`Config`] is
//! process-wide and read-only after startup; changing destinations
//! requires a restart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BullhornError;

/// Default maximum chunk length, in Unicode scalar values.
///
/// Matches the destination platform's per-message limit. Kept as config
/// rather than a hard-coded assumption so the counting rule can be
/// tightened without touching the pipeline.
pub const DEFAULT_CHUNK_LIMIT: usize = 4096;

/// Default campaign tag prefix on qualifying source messages.
pub const DEFAULT_CAMPAIGN_PREFIX: &str = "MARKETING_CAMPAIGN";

/// Root configuration for the relay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Slack ingestion settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Telegram delivery settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Pipeline tuning.
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Slack ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`) for the Web API.
    #[serde(default, alias = "botToken")]
    pub bot_token: String,

    /// App-level token (`xapp-...`) for the Socket Mode connection.
    #[serde(default, alias = "appToken")]
    pub app_token: String,

    /// The single channel whose messages are relayed.
    #[serde(default, alias = "channelId")]
    pub channel_id: String,

    /// Only messages whose metadata event type starts with this prefix
    /// qualify for forwarding.
    #[serde(default = "default_campaign_prefix", alias = "campaignPrefix")]
    pub campaign_prefix: String,
}

/// Telegram delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    /// Bot token for the Telegram Bot API.
    #[serde(default, alias = "botToken")]
    pub bot_token: String,

    /// Destination chat identifiers (numeric IDs or `@handles`).
    #[serde(default)]
    pub destinations: Vec<String>,
}

/// Pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Maximum chunk length in Unicode scalar values.
    #[serde(default = "default_chunk_limit", alias = "chunkLimit")]
    pub chunk_limit: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chunk_limit: DEFAULT_CHUNK_LIMIT,
        }
    }
}

fn default_chunk_limit() -> usize {
    DEFAULT_CHUNK_LIMIT
}

fn default_campaign_prefix() -> String {
    DEFAULT_CAMPAIGN_PREFIX.into()
}

impl Config {
    /// Default config file location: `~/.bullhorn/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bullhorn")
            .join("config.json")
    }

    /// Load configuration from `path`, then apply env-var overrides.
    ///
    /// A missing file is not an error -- the relay can run entirely from
    /// environment variables. A present but malformed file is.
    pub fn load(path: &Path) -> Result<Self, BullhornError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Overlay values from the process environment.
    ///
    /// `TELEGRAM_GROUP_IDS` is a comma-separated list; blank entries are
    /// dropped.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("SLACK_BOT_TOKEN") {
            self.slack.bot_token = v;
        }
        if let Ok(v) = std::env::var("SLACK_APP_TOKEN") {
            self.slack.app_token = v;
        }
        if let Ok(v) = std::env::var("SLACK_CHANNEL_ID") {
            self.slack.channel_id = v;
        }
        if let Ok(v) = std::env::var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = v;
        }
        if let Ok(v) = std::env::var("TELEGRAM_GROUP_IDS") {
            self.telegram.destinations = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Validate that every required field is present.
    ///
    /// Reports *all* missing fields in one error so a misconfigured
    /// deployment can be fixed in a single pass.
    pub fn validate(&self) -> Result<(), BullhornError> {
        let checks: BTreeMap<&str, bool> = BTreeMap::from([
            ("slack.bot_token", self.slack.bot_token.is_empty()),
            ("slack.app_token", self.slack.app_token.is_empty()),
            ("slack.channel_id", self.slack.channel_id.is_empty()),
            ("telegram.bot_token", self.telegram.bot_token.is_empty()),
            (
                "telegram.destinations",
                self.telegram.destinations.is_empty(),
            ),
        ]);

        let missing: Vec<&str> = checks
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();

        if !missing.is_empty() {
            return Err(BullhornError::ConfigInvalid {
                reason: format!("missing required fields: {}", missing.join(", ")),
            });
        }

        if self.relay.chunk_limit == 0 {
            return Err(BullhornError::ConfigInvalid {
                reason: "relay.chunk_limit must be greater than zero".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> Config {
        Config {
            slack: SlackConfig {
                bot_token: "xoxb-test".into(),
                app_token: "xapp-test".into(),
                channel_id: "C012345".into(),
                campaign_prefix: DEFAULT_CAMPAIGN_PREFIX.into(),
            },
            telegram: TelegramConfig {
                bot_token: "123:ABC".into(),
                destinations: vec!["-1001".into(), "@news".into()],
            },
            relay: RelayConfig::default(),
        }
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.relay.chunk_limit, DEFAULT_CHUNK_LIMIT);
        assert!(config.slack.bot_token.is_empty());
        assert!(config.telegram.destinations.is_empty());
    }

    #[test]
    fn deserialize_with_defaults() {
        let json = r#"{
            "slack": {"bot_token": "xoxb-1", "app_token": "xapp-1", "channel_id": "C1"},
            "telegram": {"bot_token": "1:A", "destinations": ["-100"]}
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.slack.campaign_prefix, DEFAULT_CAMPAIGN_PREFIX);
        assert_eq!(config.relay.chunk_limit, DEFAULT_CHUNK_LIMIT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn camel_case_aliases_accepted() {
        let json = r#"{
            "slack": {"botToken": "xoxb-1", "appToken": "xapp-1", "channelId": "C1"},
            "telegram": {"botToken": "1:A", "destinations": ["-100"]},
            "relay": {"chunkLimit": 2048}
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.slack.bot_token, "xoxb-1");
        assert_eq!(config.relay.chunk_limit, 2048);
    }

    #[test]
    fn validate_complete_config() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn validate_reports_all_missing_fields() {
        let err = Config::default().validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("slack.bot_token"), "{msg}");
        assert!(msg.contains("slack.app_token"), "{msg}");
        assert!(msg.contains("slack.channel_id"), "{msg}");
        assert!(msg.contains("telegram.bot_token"), "{msg}");
        assert!(msg.contains("telegram.destinations"), "{msg}");
    }

    #[test]
    fn validate_rejects_zero_chunk_limit() {
        let mut config = complete_config();
        config.relay.chunk_limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chunk_limit"));
    }

    #[test]
    fn group_ids_env_parsing_drops_blanks() {
        let mut config = Config::default();
        // Exercise the parsing logic directly rather than mutating the
        // process environment, which is unsafe under parallel tests.
        config.telegram.destinations = " -100, @news ,, "
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        assert_eq!(config.telegram.destinations, vec!["-100", "@news"]);
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let path = PathBuf::from("/nonexistent/bullhorn/config.json");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.relay.chunk_limit, DEFAULT_CHUNK_LIMIT);
    }
}

//! `bullhorn` -- relays campaign announcements from Slack to Telegram.
//!
//! The binary loads configuration, verifies both bot tokens, then runs
//! the Socket Mode listener until Ctrl+C. Each qualifying campaign
//! message is rendered to Telegram HTML, split into size-limited
//! chunks, and delivered to every configured destination chat.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use bullhorn_channels::dispatch::Dispatcher;
use bullhorn_channels::slack::SlackListener;
use bullhorn_channels::telegram::TelegramClient;
use bullhorn_types::config::Config;

mod relay;

/// Slack-to-Telegram campaign relay.
#[derive(Parser)]
#[command(name = "bullhorn", about = "Slack-to-Telegram campaign relay", version)]
struct Cli {
    /// Config file path (overrides the default location).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&path)?;
    config.validate()?;

    // Verify both bot identities before listening.
    let telegram = TelegramClient::new(config.telegram.bot_token.clone());
    let me = telegram.get_me().await?;
    info!(
        bot = me.username.as_deref().unwrap_or(&me.first_name),
        "Telegram token verified"
    );

    let listener = SlackListener::new(&config.slack);
    let user = listener.verify().await?;
    info!(user = %user, "Slack token verified");

    let dispatcher = Dispatcher::new(config.telegram.destinations.clone());
    info!(
        destinations = dispatcher.destinations().len(),
        chunk_limit = config.relay.chunk_limit,
        "relay configured"
    );

    let forwarder = Arc::new(relay::Forwarder::new(
        telegram,
        dispatcher,
        config.relay.chunk_limit,
    ));

    // Ctrl+C cancels the listener loop.
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
            cancel_for_signal.cancel();
        }
    });

    listener.run(forwarder, cancel).await?;

    Ok(())
}

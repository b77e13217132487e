//! Orchestration: the single moderation worker and the supervision loop.
//!
//! One worker task owns the [`Moderator`] and drains events strictly in
//! arrival order; it is the sole writer to the waiting set, review registry,
//! and cooldown records. A failed session is rebuilt from scratch after a
//! short pause, discarding all in-memory state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::config::BotConfig;
use crate::core::{Event, Result};
use crate::health;
use crate::moderation::Moderator;
use crate::telegram::{run_dispatcher, TelegramBotAdapter};

/// Pause between session restarts after a fatal fault.
pub const RESTART_DELAY: Duration = Duration::from_secs(5);

/// Spawns the single event worker that owns the moderator.
pub fn spawn_worker(
    mut moderator: Moderator,
    mut rx: mpsc::UnboundedReceiver<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            moderator.process(event).await;
        }
        info!("moderation worker finished");
    })
}

/// One bot session: fresh teloxide bot, fresh moderation state, fresh worker.
async fn run_session(config: &BotConfig) -> Result<()> {
    let bot = teloxide::Bot::new(config.bot_token.clone());
    let adapter = Arc::new(TelegramBotAdapter::new(bot.clone()));
    let moderator = Moderator::new(adapter, config.admin_id, config.channel.clone());

    let (tx, rx) = mpsc::unbounded_channel();
    let worker = spawn_worker(moderator, rx);

    let result = run_dispatcher(bot, tx).await;

    // The sender is gone once the dispatcher returns; stop the worker with it
    // so a restarted session never has two writers.
    worker.abort();
    result
}

/// Main entry: spawns the liveness endpoint, then supervises bot sessions.
/// A session error is logged and followed by a full restart with fresh state;
/// a clean dispatcher stop (ctrl-c) exits.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    info!(
        admin_id = config.admin_id,
        channel = %config.channel,
        "starting suggest-bot"
    );

    let _health = health::spawn(config.health_port);

    loop {
        match run_session(&config).await {
            Ok(()) => {
                info!("dispatcher stopped, shutting down");
                return Ok(());
            }
            Err(e) => {
                error!(error = %e, "bot session failed, restarting");
                tokio::time::sleep(RESTART_DELAY).await;
            }
        }
    }
}

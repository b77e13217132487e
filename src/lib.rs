//! # suggest-bot
//!
//! Moderation relay for a Telegram channel: users submit content through the
//! bot, the single administrator accepts or rejects each submission with
//! inline buttons, and accepted content is republished to the channel.
//! All state is memory-resident; a restart starts clean.

pub mod cli;
pub mod config;
pub mod cooldown;
pub mod core;
pub mod health;
pub mod moderation;
pub mod registry;
pub mod runner;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use config::BotConfig;
pub use cooldown::{format_remaining, CooldownTracker, COOLDOWN};
pub use core::{
    init_tracing, Bot, Button, CallbackAction, CallbackEvent, ChatTarget, ContentKind, Event,
    Keyboard, Result, ReviewItem, Submission, SuggestError, User,
};
pub use moderation::Moderator;
pub use registry::PendingRegistry;
pub use runner::run_bot;
pub use telegram::TelegramBotAdapter;

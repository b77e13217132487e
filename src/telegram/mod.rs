//! Telegram transport: teloxide adapter for the Bot trait, update-to-event
//! conversion, and the dispatcher.

pub mod adapters;
pub mod bot_adapter;
pub mod runner;

pub use adapters::{content_kind, event_from_callback, event_from_message, parse_command};
pub use bot_adapter::TelegramBotAdapter;
pub use runner::run_dispatcher;

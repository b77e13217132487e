//! CLI parser and config loading.

use clap::{Parser, Subcommand};

use crate::config::BotConfig;
use crate::core::Result;

#[derive(Parser)]
#[command(name = "suggest-bot")]
#[command(about = "Telegram channel suggestion-box bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

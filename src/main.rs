//! Binary for the channel suggestion-box bot.

use anyhow::Result;
use clap::Parser;
use suggest_bot::config::LOG_FILE;
use suggest_bot::{init_tracing, load_config, run_bot, Cli, Commands};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            std::fs::create_dir_all("logs")?;
            init_tracing(LOG_FILE)?;

            let config = match load_config(token) {
                Ok(config) => config,
                Err(e) => {
                    error!(error = %e, "invalid configuration, refusing to start");
                    std::process::exit(1);
                }
            };

            run_bot(config).await?;
            Ok(())
        }
    }
}

//! Bot configuration from environment variables, validated at startup.

use std::env;

use crate::core::{ChatTarget, Result, SuggestError};

pub const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Log file path; fixed because logging must be up before config is read.
pub const LOG_FILE: &str = "logs/suggest-bot.log";

/// Startup configuration. Required values missing means the process must not
/// start; `load` returns `SuggestError::Config` and the binary exits nonzero.
#[derive(Debug)]
pub struct BotConfig {
    pub bot_token: String,
    /// The single administrator allowed to decide submissions.
    pub admin_id: i64,
    /// Destination channel for published submissions.
    pub channel: ChatTarget,
    /// Port for the liveness endpoint.
    pub health_port: u16,
}

impl BotConfig {
    /// Loads config from the environment. If `token` is provided it overrides
    /// `BOT_TOKEN`.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token.or_else(|| env::var("BOT_TOKEN").ok()) {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(SuggestError::Config("BOT_TOKEN not set".to_string())),
        };

        let admin_id = env::var("ADMIN_ID")
            .map_err(|_| SuggestError::Config("ADMIN_ID not set".to_string()))?
            .trim()
            .parse::<i64>()
            .map_err(|_| SuggestError::Config("ADMIN_ID is not a valid number".to_string()))?;

        let channel_raw = env::var("CHANNEL_ID")
            .map_err(|_| SuggestError::Config("CHANNEL_ID not set".to_string()))?;
        if channel_raw.trim().is_empty() {
            return Err(SuggestError::Config("CHANNEL_ID is empty".to_string()));
        }
        let channel = ChatTarget::parse(&channel_raw);

        let health_port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| SuggestError::Config("PORT is not a valid port".to_string()))?,
            Err(_) => DEFAULT_HEALTH_PORT,
        };

        Ok(Self {
            bot_token,
            admin_id,
            channel,
            health_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_vars() {
        env::set_var("BOT_TOKEN", "test_token");
        env::set_var("ADMIN_ID", "123456");
        env::set_var("CHANNEL_ID", "@test_channel");
        env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn loads_with_defaults() {
        set_required_vars();

        let config = BotConfig::load(None).unwrap();

        assert_eq!(config.bot_token, "test_token");
        assert_eq!(config.admin_id, 123456);
        assert_eq!(config.channel, ChatTarget::Handle("@test_channel".to_string()));
        assert_eq!(config.health_port, DEFAULT_HEALTH_PORT);
    }

    #[test]
    #[serial]
    fn token_argument_overrides_env() {
        set_required_vars();

        let config = BotConfig::load(Some("override_token".to_string())).unwrap();

        assert_eq!(config.bot_token, "override_token");
    }

    #[test]
    #[serial]
    fn missing_bot_token_is_fatal() {
        set_required_vars();
        env::remove_var("BOT_TOKEN");

        let err = BotConfig::load(None).unwrap_err();
        assert!(matches!(err, SuggestError::Config(_)));
    }

    #[test]
    #[serial]
    fn missing_admin_id_is_fatal() {
        set_required_vars();
        env::remove_var("ADMIN_ID");

        assert!(BotConfig::load(None).is_err());
    }

    #[test]
    #[serial]
    fn invalid_admin_id_is_fatal() {
        set_required_vars();
        env::set_var("ADMIN_ID", "not-a-number");

        assert!(BotConfig::load(None).is_err());
    }

    #[test]
    #[serial]
    fn missing_channel_id_is_fatal() {
        set_required_vars();
        env::remove_var("CHANNEL_ID");

        assert!(BotConfig::load(None).is_err());
    }

    #[test]
    #[serial]
    fn numeric_channel_id_parses_as_id() {
        set_required_vars();
        env::set_var("CHANNEL_ID", "-1001234567890");

        let config = BotConfig::load(None).unwrap();
        assert_eq!(config.channel, ChatTarget::Id(-1001234567890));
    }

    #[test]
    #[serial]
    fn custom_port_is_used() {
        set_required_vars();
        env::set_var("PORT", "9999");

        let config = BotConfig::load(None).unwrap();
        assert_eq!(config.health_port, 9999);

        env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn invalid_port_is_fatal() {
        set_required_vars();
        env::set_var("PORT", "70000");

        assert!(BotConfig::load(None).is_err());

        env::remove_var("PORT");
    }
}

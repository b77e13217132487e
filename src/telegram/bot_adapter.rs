//! Wraps teloxide::Bot and implements [`crate::core::Bot`]. Production code
//! talks to Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode,
    Recipient, ReplyMarkup,
};

use crate::core::{Bot as CoreBot, ChatTarget, Keyboard, Result, SuggestError};

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn recipient(chat: &ChatTarget) -> Recipient {
    match chat {
        ChatTarget::Id(id) => Recipient::Id(ChatId(*id)),
        ChatTarget::Handle(handle) => Recipient::ChannelUsername(handle.clone()),
    }
}

fn markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.0.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
            .collect::<Vec<_>>()
    }))
}

fn transport_err(e: impl std::fmt::Display) -> SuggestError {
    SuggestError::Transport(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &ChatTarget, text: &str) -> Result<i32> {
        let sent = self
            .bot
            .send_message(recipient(chat), text)
            .await
            .map_err(transport_err)?;
        Ok(sent.id.0)
    }

    async fn send_message_with_keyboard(
        &self,
        chat: &ChatTarget,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<i32> {
        let sent = self
            .bot
            .send_message(recipient(chat), text)
            .reply_markup(markup(keyboard))
            .await
            .map_err(transport_err)?;
        Ok(sent.id.0)
    }

    async fn send_html(&self, chat: &ChatTarget, text: &str) -> Result<i32> {
        let sent = self
            .bot
            .send_message(recipient(chat), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(transport_err)?;
        Ok(sent.id.0)
    }

    async fn copy_message(
        &self,
        to: &ChatTarget,
        from_chat: i64,
        message_id: i32,
        keyboard: Option<&Keyboard>,
    ) -> Result<i32> {
        let request = self
            .bot
            .copy_message(recipient(to), ChatId(from_chat), MessageId(message_id));
        let copied = match keyboard {
            Some(kb) => {
                request
                    .reply_markup(ReplyMarkup::InlineKeyboard(markup(kb)))
                    .await
            }
            None => request.await,
        }
        .map_err(transport_err)?;
        Ok(copied.0)
    }

    async fn remove_keyboard(&self, chat: &ChatTarget, message_id: i32) -> Result<()> {
        self.bot
            .edit_message_reply_markup(recipient(chat), MessageId(message_id))
            .await
            .map_err(transport_err)?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_owned()));
        if let Some(text) = text {
            request = request.text(text);
        }
        if show_alert {
            request = request.show_alert(true);
        }
        request.await.map_err(transport_err)?;
        Ok(())
    }
}

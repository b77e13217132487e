//! Bot abstraction for the outbound chat calls the moderation flow needs.
//!
//! [`Bot`] is transport-agnostic; [`crate::telegram::TelegramBotAdapter`]
//! implements it via teloxide. Tests substitute a recording fake.

use crate::core::error::Result;
use crate::core::types::{ChatTarget, Keyboard};
use async_trait::async_trait;

/// Capability the state machine calls into: send, copy, edit, answer.
/// All message ids are the transport's numeric ids.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a plain text message; returns the sent message id.
    async fn send_message(&self, chat: &ChatTarget, text: &str) -> Result<i32>;

    /// Sends a text message with an inline keyboard attached.
    async fn send_message_with_keyboard(
        &self,
        chat: &ChatTarget,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<i32>;

    /// Sends a text message rendered as HTML (admin broadcast formatting).
    async fn send_html(&self, chat: &ChatTarget, text: &str) -> Result<i32>;

    /// Copies a message's content to another chat preserving its kind;
    /// returns the id of the copy. `keyboard` is attached to the copy.
    async fn copy_message(
        &self,
        to: &ChatTarget,
        from_chat: i64,
        message_id: i32,
        keyboard: Option<&Keyboard>,
    ) -> Result<i32>;

    /// Edits a previously sent message to remove its inline keyboard.
    async fn remove_keyboard(&self, chat: &ChatTarget, message_id: i32) -> Result<()>;

    /// Answers a button press; `show_alert` makes the answer a blocking alert.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()>;
}

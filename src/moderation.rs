//! Moderation state machine: intake of user submissions, forwarding to the
//! administrator for review, and dispatch of accept/reject decisions.
//!
//! Per-user lifecycle: Idle -> AwaitingContent -> UnderReview -> Published or
//! Rejected. Idle has no record; absence from both the waiting set and the
//! review registry means idle. Every inbound [`Event`] is a fault boundary:
//! recoverable errors are logged and surfaced to the affected party only.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::cooldown::{format_remaining, CooldownTracker};
use crate::core::{
    Bot, Button, CallbackAction, CallbackEvent, ChatTarget, ContentKind, Event, Keyboard, Result,
    ReviewItem, Submission, User,
};
use crate::registry::PendingRegistry;

pub mod texts {
    pub const WELCOME: &str =
        "Привет! 👋\n\nЧтобы написать сообщение (предложку) в канал, нажми на кнопку ниже.";
    pub const PROMPT: &str = "✍️ Пришли то, что хочешь опубликовать и жди решения модерации.";
    pub const SUBMITTED: &str = "✅ Твое сообщение отправлено на модерацию!";
    pub const PUBLISHED: &str = "✅ Твое сообщение опубликовано в канале!";
    pub const REJECTED: &str = "❌ К сожалению, твое сообщение отклонено модератором.";
    pub const SUBMIT_FAILED: &str = "❌ Произошла ошибка. Попробуй позже.";
    pub const NO_ACCESS: &str = "❌ У тебя нет доступа к этой команде.";
    pub const BROADCAST_USAGE: &str = "⚠ Использование:\n/SendAdminMessage текст сообщения";
    pub const BROADCAST_SENT: &str = "✅ Сообщение отправлено в канал без модерации.";
    pub const BROADCAST_HEADER: &str = "🔥 <b>Сообщение от администрации</b>";
    pub const DECISION_PUBLISHED: &str = "✅ Опубликовано";
    pub const DECISION_REJECTED: &str = "❌ Отклонено";
    pub const DECISION_FAILED: &str = "❌ Ошибка";
    pub const REVIEW_NOT_FOUND: &str = "Ошибка: данные не найдены";
    pub const BTN_WRITE: &str = "✍️ Написать сообщение";
    pub const BTN_SEND_MORE: &str = "➕ Отправить ещё";
    pub const BTN_ACCEPT: &str = "✅ Принять";
    pub const BTN_REJECT: &str = "❌ Отклонить";
}

/// The moderation worker's state and logic. Owns all mutable state; the single
/// event worker is the only caller, so mutation needs no locks.
pub struct Moderator {
    bot: Arc<dyn Bot>,
    admin_id: i64,
    channel: ChatTarget,
    cooldowns: CooldownTracker,
    pending: PendingRegistry,
}

impl Moderator {
    pub fn new(bot: Arc<dyn Bot>, admin_id: i64, channel: ChatTarget) -> Self {
        Self {
            bot,
            admin_id,
            channel,
            cooldowns: CooldownTracker::new(),
            pending: PendingRegistry::new(),
        }
    }

    /// Whether the user is currently expected to send content.
    pub fn is_waiting(&self, user_id: i64) -> bool {
        self.pending.is_waiting(user_id)
    }

    /// Ids of reviews still awaiting an admin decision.
    pub fn open_review_ids(&self) -> Vec<i32> {
        self.pending.review_ids()
    }

    /// Processes one inbound event. Never returns an error: failures are
    /// local to the event and reported to the relevant party here.
    #[instrument(skip(self, event))]
    pub async fn process(&mut self, event: Event) {
        match event {
            Event::Start { user, chat_id } => {
                info!(user_id = user.id, "start command");
                if let Err(e) = self.send_welcome(chat_id).await {
                    error!(error = %e, user_id = user.id, "failed to send welcome");
                }
            }
            Event::Broadcast {
                user,
                chat_id,
                text,
            } => {
                if let Err(e) = self.handle_broadcast(&user, chat_id, text.as_deref()).await {
                    error!(error = %e, user_id = user.id, "broadcast failed");
                }
            }
            Event::Callback(cb) => match cb.action {
                CallbackAction::WriteMessage | CallbackAction::SendMore => {
                    if let Err(e) = self.handle_write_request(&cb).await {
                        error!(error = %e, user_id = cb.user.id, "write request failed");
                    }
                }
                CallbackAction::Accept | CallbackAction::Reject => {
                    self.handle_decision(&cb).await;
                }
            },
            Event::Content(submission) => {
                self.handle_content(submission).await;
            }
        }
    }

    async fn send_welcome(&self, chat_id: i64) -> Result<()> {
        let kb = Keyboard::single(Button::new(
            texts::BTN_WRITE,
            CallbackAction::WriteMessage.as_str(),
        ));
        self.bot
            .send_message_with_keyboard(&chat_id.into(), texts::WELCOME, &kb)
            .await?;
        Ok(())
    }

    /// Admin-only shortcut posting straight to the channel, bypassing review.
    /// No state machine interaction: authorization check plus a non-empty
    /// text argument.
    async fn handle_broadcast(
        &self,
        user: &User,
        chat_id: i64,
        text: Option<&str>,
    ) -> Result<()> {
        if user.id != self.admin_id {
            warn!(user_id = user.id, "broadcast denied: not the admin");
            self.bot
                .send_message(&chat_id.into(), texts::NO_ACCESS)
                .await?;
            return Ok(());
        }

        let text = match text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => {
                self.bot
                    .send_message(&chat_id.into(), texts::BROADCAST_USAGE)
                    .await?;
                return Ok(());
            }
        };

        let formatted = format!("{}\n\n{}", texts::BROADCAST_HEADER, text);
        self.bot.send_html(&self.channel, &formatted).await?;
        self.bot
            .send_message(&chat_id.into(), texts::BROADCAST_SENT)
            .await?;
        info!(admin_id = user.id, "broadcast posted to channel");
        Ok(())
    }

    /// Idle -> AwaitingContent, guarded by the cooldown tracker. A refused
    /// transition leaves the user idle and shows the remaining wait.
    async fn handle_write_request(&mut self, cb: &CallbackEvent) -> Result<()> {
        if let Some(remaining) = self.cooldowns.check(cb.user.id) {
            let notice = format!(
                "⏳ Подожди {} перед следующей отправкой",
                format_remaining(remaining)
            );
            info!(user_id = cb.user.id, "write request refused by cooldown");
            self.bot
                .answer_callback(&cb.callback_id, Some(&notice), true)
                .await?;
            return Ok(());
        }

        self.pending.mark_waiting(cb.user.id);
        self.bot
            .send_message(&cb.chat_id.into(), texts::PROMPT)
            .await?;
        self.bot.answer_callback(&cb.callback_id, None, false).await?;
        info!(user_id = cb.user.id, "user awaiting content");
        Ok(())
    }

    /// AwaitingContent -> UnderReview. Content from users not in the waiting
    /// set is dropped without a response; that filter is what keeps
    /// unsolicited messages from becoming submissions.
    async fn handle_content(&mut self, submission: Submission) {
        let user_id = submission.user.id;
        if !self.pending.is_waiting(user_id) {
            return;
        }

        // Waiting status and cooldown change on receipt, before the admin
        // decides; a failed forward still consumes the attempt.
        self.pending.clear_waiting(user_id);
        self.cooldowns.record(user_id);

        match self.forward_to_admin(&submission).await {
            Ok(review_message_id) => {
                if let Err(e) = self
                    .pending
                    .register_review(review_message_id, ReviewItem { submission })
                {
                    // Broken sequencing contract; the review message is
                    // already with the admin, so only log it.
                    error!(error = %e, review_message_id, "failed to register review");
                    return;
                }

                let kb = Keyboard::single(Button::new(
                    texts::BTN_SEND_MORE,
                    CallbackAction::SendMore.as_str(),
                ));
                if let Err(e) = self
                    .bot
                    .send_message_with_keyboard(&user_id.into(), texts::SUBMITTED, &kb)
                    .await
                {
                    error!(error = %e, user_id, "failed to confirm submission");
                }
                info!(user_id, review_message_id, "submission forwarded to admin");
            }
            Err(e) => {
                error!(error = %e, user_id, "failed to forward submission");
                if let Err(e) = self
                    .bot
                    .send_message(&user_id.into(), texts::SUBMIT_FAILED)
                    .await
                {
                    error!(error = %e, user_id, "failed to notify user of forward error");
                }
            }
        }
    }

    /// Sends the submission to the admin with decision controls attached and
    /// returns the id of the keyboard-bearing message.
    async fn forward_to_admin(&self, submission: &Submission) -> Result<i32> {
        let admin: ChatTarget = self.admin_id.into();
        let user = &submission.user;
        let handle = user.username.as_deref().unwrap_or("—");
        let info = format!(
            "📩 Новое сообщение в предложку\n👤 От: {} (@{})\n🆔 ID: {}",
            user.first_name, handle, user.id
        );
        let kb = Keyboard::row(vec![
            Button::new(texts::BTN_ACCEPT, CallbackAction::Accept.as_str()),
            Button::new(texts::BTN_REJECT, CallbackAction::Reject.as_str()),
        ]);

        if submission.kind == ContentKind::Text {
            let text = submission.text.as_deref().unwrap_or_default();
            let body = format!("{info}\n\nТекст:\n{text}");
            self.bot
                .send_message_with_keyboard(&admin, &body, &kb)
                .await
        } else {
            self.bot.send_message(&admin, &info).await?;
            self.bot
                .copy_message(
                    &admin,
                    submission.chat_id,
                    submission.message_id,
                    Some(&kb),
                )
                .await
        }
    }

    /// UnderReview -> Published or Rejected. Non-admin presses are ignored
    /// outright; unknown review ids answer "not found" (already decided, or
    /// state lost to a restart). A mid-flight failure keeps the item
    /// registered and tells the admin the decision failed.
    async fn handle_decision(&mut self, cb: &CallbackEvent) {
        if cb.user.id != self.admin_id {
            return;
        }

        let item = match self.pending.get_review(cb.message_id) {
            Some(item) => item.clone(),
            None => {
                info!(review_message_id = cb.message_id, "decision on unknown review");
                if let Err(e) = self
                    .bot
                    .answer_callback(&cb.callback_id, Some(texts::REVIEW_NOT_FOUND), false)
                    .await
                {
                    error!(error = %e, "failed to answer stale decision");
                }
                return;
            }
        };

        let status = match self.execute_decision(cb, &item.submission).await {
            Ok(status) => {
                self.pending.remove_review(cb.message_id);
                status
            }
            Err(e) => {
                error!(
                    error = %e,
                    review_message_id = cb.message_id,
                    user_id = item.submission.user.id,
                    "decision failed"
                );
                texts::DECISION_FAILED
            }
        };

        if let Err(e) = self.bot.answer_callback(&cb.callback_id, Some(status), false).await {
            error!(error = %e, "failed to answer decision callback");
        }
    }

    async fn execute_decision(
        &self,
        cb: &CallbackEvent,
        submission: &Submission,
    ) -> Result<&'static str> {
        let user_chat: ChatTarget = submission.user.id.into();
        let status = if cb.action == CallbackAction::Accept {
            if submission.kind == ContentKind::Text {
                let text = submission.text.as_deref().unwrap_or_default();
                self.bot.send_message(&self.channel, text).await?;
            } else {
                self.bot
                    .copy_message(
                        &self.channel,
                        submission.chat_id,
                        submission.message_id,
                        None,
                    )
                    .await?;
            }
            self.bot.send_message(&user_chat, texts::PUBLISHED).await?;
            info!(user_id = submission.user.id, "submission published");
            texts::DECISION_PUBLISHED
        } else {
            self.bot.send_message(&user_chat, texts::REJECTED).await?;
            info!(user_id = submission.user.id, "submission rejected");
            texts::DECISION_REJECTED
        };

        // Strip the controls so the same item cannot be decided twice.
        self.bot
            .remove_keyboard(&cb.chat_id.into(), cb.message_id)
            .await?;
        Ok(status)
    }
}

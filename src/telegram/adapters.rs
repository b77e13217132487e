//! Conversion from teloxide updates to core [`Event`]s. Anything that is not
//! a recognized command, button press, or submittable content kind yields no
//! event and is dropped before it reaches the moderation worker.

use chrono::Utc;
use teloxide::types::{CallbackQuery, MaybeInaccessibleMessage, Message as TgMessage};

use crate::core::{CallbackAction, CallbackEvent, ContentKind, Event, Submission, User};

/// Commands the bot understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Start,
    /// `/SendAdminMessage <text>`; `None` when no argument followed.
    Broadcast(Option<String>),
}

/// Parses `/start`, `/start@botname`, and `/SendAdminMessage <text>` (exact
/// case, argument is everything after the first whitespace).
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, Some(args.trim())),
        None => (rest, None),
    };
    let name = head.split('@').next().unwrap_or(head);
    match name {
        "start" => Some(ParsedCommand::Start),
        "SendAdminMessage" => Some(ParsedCommand::Broadcast(
            args.filter(|a| !a.is_empty()).map(str::to_owned),
        )),
        _ => None,
    }
}

/// Submission kind of a message, if it carries one we accept.
pub fn content_kind(msg: &TgMessage) -> Option<ContentKind> {
    if msg.text().is_some() {
        Some(ContentKind::Text)
    } else if msg.photo().is_some() {
        Some(ContentKind::Photo)
    } else if msg.video().is_some() {
        Some(ContentKind::Video)
    } else if msg.voice().is_some() {
        Some(ContentKind::Voice)
    } else if msg.document().is_some() {
        Some(ContentKind::Document)
    } else {
        None
    }
}

fn core_user(from: &teloxide::types::User) -> User {
    User {
        id: from.id.0 as i64,
        first_name: from.first_name.clone(),
        username: from.username.clone(),
    }
}

/// Converts an inbound message to an event. Commands win over content; text
/// that is not a command is a text submission. Messages without a sender
/// (channel posts) are dropped.
pub fn event_from_message(msg: &TgMessage) -> Option<Event> {
    let user = core_user(msg.from.as_ref()?);
    let chat_id = msg.chat.id.0;

    if let Some(text) = msg.text() {
        match parse_command(text) {
            Some(ParsedCommand::Start) => return Some(Event::Start { user, chat_id }),
            Some(ParsedCommand::Broadcast(text)) => {
                return Some(Event::Broadcast {
                    user,
                    chat_id,
                    text,
                })
            }
            None => {}
        }
    }

    let kind = content_kind(msg)?;
    Some(Event::Content(Submission {
        user,
        chat_id,
        message_id: msg.id.0,
        kind,
        text: msg.text().map(str::to_owned),
        received_at: Utc::now(),
    }))
}

/// Converts a button press to an event. Unknown payloads and presses whose
/// origin message is no longer available are dropped.
pub fn event_from_callback(q: &CallbackQuery) -> Option<Event> {
    let action = CallbackAction::parse(q.data.as_deref()?)?;
    // An inaccessible origin still carries the chat and message id, which is
    // all a decision needs.
    let (chat_id, message_id) = match q.message.as_ref()? {
        MaybeInaccessibleMessage::Regular(m) => (m.chat.id.0, m.id.0),
        MaybeInaccessibleMessage::Inaccessible(m) => (m.chat.id.0, m.message_id.0),
    };
    Some(Event::Callback(CallbackEvent {
        user: core_user(&q.from),
        chat_id,
        message_id,
        callback_id: q.id.0.clone(),
        action,
    }))
}

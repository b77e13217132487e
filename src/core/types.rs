//! Core types: user, submission, review item, inbound events, and the
//! transport-agnostic keyboard/addressing types the [`crate::core::Bot`] trait
//! works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User identity (id, display name, optional handle). Ephemeral, built from
/// inbound updates and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

/// Kind of content a submission may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Text,
    Photo,
    Video,
    Voice,
    Document,
}

/// One piece of content a user wants published. Owned by the moderation state
/// machine from receipt until the admin decision removes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub user: User,
    /// Chat the content arrived in (source for `copy_message`).
    pub chat_id: i64,
    /// Message id of the original content in `chat_id`.
    pub message_id: i32,
    pub kind: ContentKind,
    /// Set for [`ContentKind::Text`]; media content is republished by copy.
    pub text: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// Associates one outstanding admin-facing review message with the submission
/// shown in it. Keyed externally by the review message id.
#[derive(Debug, Clone)]
pub struct ReviewItem {
    pub submission: Submission,
}

/// Destination addressing: a numeric chat id or a public `@handle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatTarget {
    Id(i64),
    Handle(String),
}

impl ChatTarget {
    /// Parses a raw destination string: numeric ids stay numeric, anything
    /// else is treated as a channel handle (leading `@` added if missing).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<i64>() {
            ChatTarget::Id(id)
        } else if let Some(stripped) = raw.strip_prefix('@') {
            ChatTarget::Handle(format!("@{stripped}"))
        } else {
            ChatTarget::Handle(format!("@{raw}"))
        }
    }
}

impl From<i64> for ChatTarget {
    fn from(id: i64) -> Self {
        ChatTarget::Id(id)
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTarget::Id(id) => write!(f, "{id}"),
            ChatTarget::Handle(h) => write!(f, "{h}"),
        }
    }
}

/// One inline button: visible label plus the callback payload it sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Inline keyboard as rows of buttons; mapped by the transport adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard(pub Vec<Vec<Button>>);

impl Keyboard {
    /// Keyboard with a single row.
    pub fn row(buttons: Vec<Button>) -> Self {
        Self(vec![buttons])
    }

    /// Keyboard with a single button.
    pub fn single(button: Button) -> Self {
        Self::row(vec![button])
    }
}

/// Recognized button payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    WriteMessage,
    SendMore,
    Accept,
    Reject,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "write_msg" => Some(Self::WriteMessage),
            "send_more" => Some(Self::SendMore),
            "accept" => Some(Self::Accept),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WriteMessage => "write_msg",
            Self::SendMore => "send_more",
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

/// A button press, carrying the message it was attached to.
#[derive(Debug, Clone)]
pub struct CallbackEvent {
    pub user: User,
    pub chat_id: i64,
    /// Id of the message the pressed keyboard is attached to. For decision
    /// buttons this is the review message id.
    pub message_id: i32,
    /// Transport id used to answer the press.
    pub callback_id: String,
    pub action: CallbackAction,
}

/// Inbound event as seen by the moderation worker.
#[derive(Debug, Clone)]
pub enum Event {
    /// `/start` command.
    Start { user: User, chat_id: i64 },
    /// `/SendAdminMessage` command; `text` is everything after the command,
    /// `None` when the command came bare.
    Broadcast {
        user: User,
        chat_id: i64,
        text: Option<String>,
    },
    /// Inline button press.
    Callback(CallbackEvent),
    /// Content message of a recognized kind.
    Content(Submission),
}

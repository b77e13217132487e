//! Core: transport-agnostic types, the Bot capability trait, errors, logging.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{Result, SuggestError};
pub use logger::init_tracing;
pub use types::{
    Button, CallbackAction, CallbackEvent, ChatTarget, ContentKind, Event, Keyboard, ReviewItem,
    Submission, User,
};

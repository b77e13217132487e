//! Teloxide dispatcher: converts updates to core events and pushes them into
//! the moderation worker's channel. Holds no moderation state itself.

use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

use crate::core::{Event, Result, SuggestError};
use crate::telegram::adapters::{event_from_callback, event_from_message};

fn forward(tx: &UnboundedSender<Event>, event: Event) {
    // Send only fails when the worker is gone; the supervision loop will
    // rebuild the session.
    if tx.send(event).is_err() {
        warn!("moderation worker gone, dropping event");
    }
}

async fn on_message(
    msg: teloxide::types::Message,
    tx: UnboundedSender<Event>,
) -> ResponseResult<()> {
    match event_from_message(&msg) {
        Some(event) => {
            info!(
                chat_id = msg.chat.id.0,
                message_id = msg.id.0,
                "received message"
            );
            forward(&tx, event);
        }
        None => debug!(chat_id = msg.chat.id.0, "ignoring unsupported message"),
    }
    Ok(())
}

async fn on_callback(q: CallbackQuery, tx: UnboundedSender<Event>) -> ResponseResult<()> {
    match event_from_callback(&q) {
        Some(event) => {
            info!(user_id = q.from.id.0, "received button press");
            forward(&tx, event);
        }
        None => debug!(user_id = q.from.id.0, "ignoring unknown button press"),
    }
    Ok(())
}

/// Runs long polling until the dispatcher stops. Verifies the token with
/// `get_me` first so a bad token surfaces as an error instead of a silent
/// retry loop.
#[instrument(skip(bot, tx))]
pub async fn run_dispatcher(bot: teloxide::Bot, tx: UnboundedSender<Event>) -> Result<()> {
    let me = bot
        .get_me()
        .await
        .map_err(|e| SuggestError::Transport(format!("get_me failed: {e}")))?;
    info!(username = %me.username(), "starting long polling");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![tx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

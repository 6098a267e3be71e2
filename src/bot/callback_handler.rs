//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::invitation_model::Identity;
use crate::router::{InboundEvent, Outcome, Router};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, router: Arc<Router>) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    // The candidate is whoever owns the chat the invite was posted in
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));

    if let Some(data) = q.data.clone() {
        let outcome = router
            .handle(InboundEvent::Callback {
                from: Identity(chat_id.0),
                data,
                language: q.from.language_code.clone(),
            })
            .await;
        debug!(user_id = %q.from.id, outcome = ?outcome, "Callback routed");

        // Drop the Confirm button so the invite cannot be confirmed twice
        if let (Outcome::Confirmed { .. }, Some(msg)) = (&outcome, &q.message) {
            if let Err(e) = bot.edit_message_reply_markup(msg.chat().id, msg.id()).await {
                error!(user_id = %q.from.id, error = %e, "Failed to remove confirm button");
            }
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id.clone()).await?;

    Ok(())
}

//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::invitation_model::Identity;
use crate::router::{InboundEvent, Router};

/// Convert a Telegram message into a router event.
///
/// Only text messages take part in the invitation flow.
pub fn inbound_text_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;

    // Extract user's language code from Telegram
    let language = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.clone());

    Some(InboundEvent::Text {
        from: Identity(msg.chat.id.0),
        text: text.to_string(),
        language,
    })
}

/// Handle incoming messages
pub async fn message_handler(msg: Message, router: Arc<Router>) -> Result<()> {
    let Some(event) = inbound_text_event(&msg) else {
        debug!(user_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    let outcome = router.handle(event).await;
    debug!(user_id = %msg.chat.id, outcome = ?outcome, "Message routed");

    Ok(())
}

//! Telegram implementation of the router's outbound boundary

use async_trait::async_trait;
use teloxide::prelude::*;

use crate::errors::NotifyError;
use crate::invitation_model::Identity;
use crate::notifier::{Notifier, OutboundMessage};

use super::ui_builder::build_inline_keyboard;

/// Sends router messages through the Bot API
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, to: Identity, message: OutboundMessage) -> Result<(), NotifyError> {
        let request = self.bot.send_message(ChatId(to.0), message.text);

        let result = match build_inline_keyboard(&message.buttons) {
            Some(keyboard) => request.reply_markup(keyboard).await,
            None => request.await,
        };

        result.map(|_| ()).map_err(|e| NotifyError::Delivery {
            recipient: to,
            reason: e.to_string(),
        })
    }
}

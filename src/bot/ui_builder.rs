//! UI Builder module for turning outbound buttons into Telegram keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::notifier::Button;

/// Build a single-row inline keyboard, or `None` when there are no buttons
pub fn build_inline_keyboard(buttons: &[Button]) -> Option<InlineKeyboardMarkup> {
    if buttons.is_empty() {
        return None;
    }

    let row: Vec<InlineKeyboardButton> = buttons
        .iter()
        .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.data.clone()))
        .collect();

    Some(InlineKeyboardMarkup::new(vec![row]))
}

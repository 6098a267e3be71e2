//! Telegram adapter for the invitation router
//!
//! - `message_handler`: turns text messages into router events
//! - `callback_handler`: handles inline keyboard callback queries
//! - `telegram_notifier`: delivers router messages through the Bot API
//! - `ui_builder`: builds inline keyboards

pub mod callback_handler;
pub mod message_handler;
pub mod telegram_notifier;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;
pub use telegram_notifier::TelegramNotifier;

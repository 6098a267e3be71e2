//! # Interview Invitation Bot
//!
//! A Telegram bot that lets HR staff invite candidates to interviews and
//! routes the candidates' confirmations and proposed dates back to the HR who
//! invited them.

pub mod bot;
pub mod command_parser;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod invitation_model;
pub mod localization;
pub mod notifier;
pub mod registry;
pub mod router;

//! # Error Types Module
//!
//! Structured errors for command parsing, message delivery and startup
//! configuration.

use thiserror::Error;

use crate::invitation_model::Identity;

/// Why an HR command could not be turned into a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InviteError {
    /// Fewer tokens than the command needs
    #[error("missing arguments: expected {expected}, got {got}")]
    MissingArguments { expected: usize, got: usize },
    /// Candidate identifier token is not a 64-bit integer
    #[error("invalid candidate identity: {0}")]
    InvalidIdentity(String),
}

/// Notifier delivery failures
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery to {recipient} failed: {reason}")]
    Delivery { recipient: Identity, reason: String },
}

/// Startup configuration errors, fatal for the process
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

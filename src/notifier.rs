//! Outbound message boundary between the router and the messaging platform

use async_trait::async_trait;

use crate::errors::NotifyError;
use crate::invitation_model::Identity;

/// Inline button attached below a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    /// Payload delivered back in the callback query
    pub data: String,
}

/// A rendered message ready to be delivered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutboundMessage {
    pub text: String,
    /// One row of inline buttons, empty for plain text
    pub buttons: Vec<Button>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, label: impl Into<String>, data: impl Into<String>) -> Self {
        self.buttons.push(Button {
            label: label.into(),
            data: data.into(),
        });
        self
    }
}

/// Delivers messages to chat participants.
///
/// Retries and delivery guarantees belong to the implementation; the router
/// only logs failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: Identity, message: OutboundMessage) -> Result<(), NotifyError>;
}

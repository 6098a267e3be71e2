//! Shared helpers for router integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use interview_bot::config::{ResolutionPolicy, RouterConfig};
use interview_bot::errors::NotifyError;
use interview_bot::invitation_model::Identity;
use interview_bot::notifier::{Notifier, OutboundMessage};
use interview_bot::registry::InvitationRegistry;
use interview_bot::router::{InboundEvent, Router};

/// Notifier that records every message instead of sending it
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Identity, OutboundMessage)>>,
    unreachable: Mutex<HashSet<Identity>>,
}

impl RecordingNotifier {
    /// Make deliveries to `id` fail
    pub fn block(&self, id: i64) {
        self.unreachable.lock().unwrap().insert(Identity(id));
    }

    pub fn sent(&self) -> Vec<(Identity, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, id: i64) -> Vec<OutboundMessage> {
        self.sent()
            .into_iter()
            .filter(|(to, _)| *to == Identity(id))
            .map(|(_, message)| message)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: Identity, message: OutboundMessage) -> Result<(), NotifyError> {
        if self.unreachable.lock().unwrap().contains(&to) {
            return Err(NotifyError::Delivery {
                recipient: to,
                reason: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        self.sent.lock().unwrap().push((to, message));
        Ok(())
    }
}

pub struct Harness {
    pub router: Router,
    pub registry: Arc<InvitationRegistry>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(resolution: ResolutionPolicy, strict_date_replies: bool) -> Harness {
    harness_with(RouterConfig {
        default_language: "en".to_string(),
        resolution,
        strict_date_replies,
    })
}

pub fn harness_with(config: RouterConfig) -> Harness {
    let registry = Arc::new(InvitationRegistry::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let router = Router::new(registry.clone(), notifier.clone(), config);
    Harness {
        router,
        registry,
        notifier,
    }
}

pub fn default_harness() -> Harness {
    harness(ResolutionPolicy::RemoveOnResolve, false)
}

pub fn text(from: i64, text: &str) -> InboundEvent {
    InboundEvent::Text {
        from: Identity(from),
        text: text.to_string(),
        language: None,
    }
}

pub fn text_in(from: i64, text: &str, language: &str) -> InboundEvent {
    InboundEvent::Text {
        from: Identity(from),
        text: text.to_string(),
        language: Some(language.to_string()),
    }
}

pub fn callback(from: i64, data: &str) -> InboundEvent {
    InboundEvent::Callback {
        from: Identity(from),
        data: data.to_string(),
        language: None,
    }
}

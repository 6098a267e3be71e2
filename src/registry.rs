//! # Invitation Registry Module
//!
//! In-memory relation from candidate identity to the invitation that is
//! currently active for them. This is the only shared mutable state of the
//! bot.
//!
//! # Concurrency
//!
//! The dispatcher handles different chats concurrently, so every access goes
//! through a single `tokio::sync::Mutex`. Volume is low enough that per-key
//! locking is not worth it. The lock is only held for the map operation
//! itself, never across message delivery.

use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::invitation_model::{Identity, InvitationLink};

/// Candidate → inviting HR mapping, one active link per candidate
#[derive(Debug, Default)]
pub struct InvitationRegistry {
    links: Mutex<HashMap<Identity, InvitationLink>>,
}

impl InvitationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the link for a candidate.
    ///
    /// Always succeeds; the replaced link, if any, is returned.
    pub async fn put(&self, candidate_id: Identity, link: InvitationLink) -> Option<InvitationLink> {
        let previous = self.links.lock().await.insert(candidate_id, link);
        if let Some(ref old) = previous {
            debug!(candidate_id = %candidate_id, previous_hr = %old.hr_id, "Replaced existing invitation link");
        }
        previous
    }

    /// Current link for a candidate
    pub async fn get(&self, candidate_id: Identity) -> Option<InvitationLink> {
        self.links.lock().await.get(&candidate_id).cloned()
    }

    /// HR currently responsible for a candidate
    pub async fn hr_for(&self, candidate_id: Identity) -> Option<Identity> {
        self.links
            .lock()
            .await
            .get(&candidate_id)
            .map(|link| link.hr_id)
    }

    /// Drop the link for a candidate, returning it
    pub async fn remove(&self, candidate_id: Identity) -> Option<InvitationLink> {
        self.links.lock().await.remove(&candidate_id)
    }

    /// Remove the link only while `predicate` holds for it.
    ///
    /// Check and removal happen under one lock, so an invitation put between
    /// an earlier read and this call is judged on its own fields.
    pub async fn remove_if<F>(&self, candidate_id: Identity, predicate: F) -> Option<InvitationLink>
    where
        F: FnOnce(&InvitationLink) -> bool,
    {
        let mut links = self.links.lock().await;
        match links.get(&candidate_id) {
            Some(link) if predicate(link) => links.remove(&candidate_id),
            _ => None,
        }
    }

    /// Remove the link only if it is still owned by `hr_id`
    pub async fn remove_if_owned(
        &self,
        candidate_id: Identity,
        hr_id: Identity,
    ) -> Option<InvitationLink> {
        self.remove_if(candidate_id, |link| link.hr_id == hr_id).await
    }

    /// Pending invitations issued by one HR, oldest first
    pub async fn pending_for(&self, hr_id: Identity) -> Vec<(Identity, InvitationLink)> {
        let mut pending: Vec<_> = self
            .links
            .lock()
            .await
            .iter()
            .filter(|(_, link)| link.hr_id == hr_id)
            .map(|(candidate, link)| (*candidate, link.clone()))
            .collect();
        pending.sort_by_key(|(candidate, link)| (link.invited_at, *candidate));
        pending
    }

    pub async fn len(&self) -> usize {
        self.links.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.lock().await.is_empty()
    }
}

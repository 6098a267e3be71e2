//! # Invitation Data Model
//!
//! Core types shared by the parser, the registry and the router: chat
//! identities, invite requests and the registry's invitation links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque chat participant identifier supplied by the messaging platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub i64);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the interview date gets settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteMode {
    /// HR proposes a date, candidate confirms with a button
    FixedDate,
    /// Candidate replies with a date of their choosing
    NegotiatedDate,
}

/// A parsed `/invite` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRequest {
    pub candidate_id: Identity,
    pub name: String,
    pub link: String,
    /// Present for fixed-date invites, absent when the candidate picks the date
    pub date: Option<String>,
}

impl InviteRequest {
    pub fn mode(&self) -> InviteMode {
        if self.date.is_some() {
            InviteMode::FixedDate
        } else {
            InviteMode::NegotiatedDate
        }
    }
}

/// Registry value: which HR invited a candidate, and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationLink {
    pub hr_id: Identity,
    pub mode: InviteMode,
    pub candidate_name: String,
    /// Language the HR used when issuing the invite, for replies back to them
    pub hr_language: Option<String>,
    pub invited_at: DateTime<Utc>,
}

impl InvitationLink {
    /// Create a link for the given request issued by `hr_id` right now
    pub fn new(hr_id: Identity, request: &InviteRequest, hr_language: Option<&str>) -> Self {
        Self {
            hr_id,
            mode: request.mode(),
            candidate_name: request.name.clone(),
            hr_language: hr_language.map(|s| s.to_string()),
            invited_at: Utc::now(),
        }
    }
}

//! Candidate conversation states and date reply validation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::invitation_model::{InvitationLink, InviteMode};

lazy_static! {
    /// `DD.MM.YYYY HH:MM`, the format the date prompt asks for
    static ref DATE_REPLY_PATTERN: Regex =
        Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}\s+\d{1,2}:\d{2}$").expect("valid date reply regex");
}

/// Where a candidate stands in the invitation flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterviewState {
    #[default]
    Uninvited,
    AwaitingConfirmation,
    AwaitingDate,
}

impl InterviewState {
    /// State implied by the candidate's registry entry
    pub fn from_link(link: Option<&InvitationLink>) -> Self {
        match link.map(|l| l.mode) {
            None => InterviewState::Uninvited,
            Some(InviteMode::FixedDate) => InterviewState::AwaitingConfirmation,
            Some(InviteMode::NegotiatedDate) => InterviewState::AwaitingDate,
        }
    }
}

/// Validates a date reply from a candidate
pub fn validate_date_reply(text: &str, strict: bool) -> Result<String, &'static str> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if strict && !DATE_REPLY_PATTERN.is_match(trimmed) {
        return Err("format");
    }

    Ok(trimmed.to_string())
}

//! # Command Parser Module
//!
//! Turns raw chat text into typed bot commands and `/invite` arguments into an
//! [`InviteRequest`]. Everything here is a pure function of its input.
//!
//! ## Invite grammar
//!
//! - `/invite [--fixed] <candidate_id> <name> <date> <link>`: the HR fixes the
//!   date and the candidate confirms with a button
//! - `/invite [--ask] <candidate_id> <name> <link>`: the candidate replies
//!   with a date
//!
//! Without a flag the mode follows the argument count.

use crate::errors::InviteError;
use crate::invitation_model::{Identity, InviteMode, InviteRequest};

/// Flag forcing the fixed-date mode
pub const FIXED_DATE_FLAG: &str = "--fixed";
/// Flag forcing the negotiated-date mode
pub const NEGOTIATED_DATE_FLAG: &str = "--ask";

const FIXED_DATE_TOKENS: usize = 4;
const NEGOTIATED_DATE_TOKENS: usize = 3;

/// Callback payload prefix of the Confirm button
pub const CONFIRM_PREFIX: &str = "confirm:";

/// Commands understood by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// `/invite` with its raw argument string
    Invite(String),
    /// `/cancel` with its raw argument string
    Cancel(String),
    Pending,
    /// Any other `/command`, carrying the command word
    Unknown(String),
}

impl Command {
    /// Parse a chat message into a command.
    ///
    /// Returns `None` for text that is not a command at all. The command word
    /// may carry a `@botname` suffix as Telegram adds in group chats.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;

        let (word, args) = match rest.find(char::is_whitespace) {
            Some(pos) => (&rest[..pos], rest[pos..].trim()),
            None => (rest, ""),
        };
        let word = word.split('@').next().unwrap_or(word).to_lowercase();

        let command = match word.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "invite" => Command::Invite(args.to_string()),
            "cancel" => Command::Cancel(args.to_string()),
            "pending" => Command::Pending,
            _ => Command::Unknown(word),
        };
        Some(command)
    }
}

/// Parse a candidate identifier token
pub fn parse_candidate_id(token: &str) -> Result<Identity, InviteError> {
    token
        .parse::<i64>()
        .map(Identity)
        .map_err(|_| InviteError::InvalidIdentity(token.to_string()))
}

/// Parse the arguments of an `/invite` command.
///
/// The token count is checked before the candidate identifier is parsed, so
/// `/invite abc` reports missing arguments rather than a bad identity.
pub fn parse_invite(args: &str) -> Result<InviteRequest, InviteError> {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();

    let forced_mode = match tokens.first().copied() {
        Some(FIXED_DATE_FLAG) => Some(InviteMode::FixedDate),
        Some(NEGOTIATED_DATE_FLAG) => Some(InviteMode::NegotiatedDate),
        _ => None,
    };
    if forced_mode.is_some() {
        tokens.remove(0);
    }

    let mode = match forced_mode {
        Some(mode) => mode,
        None if tokens.len() == NEGOTIATED_DATE_TOKENS => InviteMode::NegotiatedDate,
        None if tokens.len() >= FIXED_DATE_TOKENS => InviteMode::FixedDate,
        None => {
            return Err(InviteError::MissingArguments {
                expected: NEGOTIATED_DATE_TOKENS,
                got: tokens.len(),
            })
        }
    };

    match mode {
        InviteMode::FixedDate => parse_fixed_date(&tokens),
        InviteMode::NegotiatedDate => parse_negotiated_date(&tokens),
    }
}

fn parse_fixed_date(tokens: &[&str]) -> Result<InviteRequest, InviteError> {
    if tokens.len() < FIXED_DATE_TOKENS {
        return Err(InviteError::MissingArguments {
            expected: FIXED_DATE_TOKENS,
            got: tokens.len(),
        });
    }

    let candidate_id = parse_candidate_id(tokens[0])?;
    let name = tokens[1].to_string();

    // Dates such as "01.01.2030 10:00" span several tokens, so the link is
    // located by shape first and by position only as a fallback.
    let rest = &tokens[2..];
    let link_index = rest
        .iter()
        .position(|token| looks_like_link(token))
        .unwrap_or(rest.len() - 1);

    let date = rest
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != link_index)
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(InviteRequest {
        candidate_id,
        name,
        link: rest[link_index].to_string(),
        date: Some(date),
    })
}

fn parse_negotiated_date(tokens: &[&str]) -> Result<InviteRequest, InviteError> {
    if tokens.len() < NEGOTIATED_DATE_TOKENS {
        return Err(InviteError::MissingArguments {
            expected: NEGOTIATED_DATE_TOKENS,
            got: tokens.len(),
        });
    }

    Ok(InviteRequest {
        candidate_id: parse_candidate_id(tokens[0])?,
        name: tokens[1].to_string(),
        link: tokens[2].to_string(),
        date: None,
    })
}

fn looks_like_link(token: &str) -> bool {
    token.contains("://") || token.starts_with("www.")
}

/// Actions carried by inline button payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Candidate confirms the invitation sent by `hr_id`
    Confirm { hr_id: Identity },
}

impl CallbackAction {
    /// Decode a callback payload; unknown or malformed payloads yield `None`
    pub fn parse(data: &str) -> Option<CallbackAction> {
        let hr_id = data.strip_prefix(CONFIRM_PREFIX)?.parse::<i64>().ok()?;
        Some(CallbackAction::Confirm {
            hr_id: Identity(hr_id),
        })
    }

    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Confirm { hr_id } => format!("{CONFIRM_PREFIX}{hr_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_recognition() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/help@interview_bot"), Some(Command::Help));
        assert_eq!(
            Command::parse("/invite 42 Alice https://meet/x"),
            Some(Command::Invite("42 Alice https://meet/x".to_string()))
        );
        assert_eq!(Command::parse("/cancel  42 "), Some(Command::Cancel("42".to_string())));
        assert_eq!(Command::parse("/pending"), Some(Command::Pending));
        assert_eq!(Command::parse("/foo bar"), Some(Command::Unknown("foo".to_string())));
        assert_eq!(Command::parse("05.05.2030 14:00"), None);
    }

    #[test]
    fn test_fixed_date_positional_order() {
        let request = parse_invite("42 Alice 01.01.2030 https://meet/x").unwrap();
        assert_eq!(request.candidate_id, Identity(42));
        assert_eq!(request.date.as_deref(), Some("01.01.2030"));
        assert_eq!(request.link, "https://meet/x");
    }

    #[test]
    fn test_fixed_date_spanning_tokens() {
        let request = parse_invite("42 Alice https://meet/x 01.01.2030 10:00").unwrap();
        assert_eq!(request.link, "https://meet/x");
        assert_eq!(request.date.as_deref(), Some("01.01.2030 10:00"));
    }

    #[test]
    fn test_fixed_date_without_url_uses_last_token() {
        let request = parse_invite("42 Alice tomorrow noon room-5").unwrap();
        assert_eq!(request.link, "room-5");
        assert_eq!(request.date.as_deref(), Some("tomorrow noon"));
    }

    #[test]
    fn test_negotiated_date_by_count() {
        let request = parse_invite("42 Alice https://meet/x").unwrap();
        assert_eq!(request.mode(), InviteMode::NegotiatedDate);
        assert_eq!(request.date, None);
    }

    #[test]
    fn test_explicit_flags() {
        let request = parse_invite("--ask 42 Alice https://meet/x extra").unwrap();
        assert_eq!(request.mode(), InviteMode::NegotiatedDate);
        assert_eq!(request.link, "https://meet/x");

        let err = parse_invite("--fixed 42 Alice https://meet/x").unwrap_err();
        assert_eq!(err, InviteError::MissingArguments { expected: 4, got: 3 });
    }

    #[test]
    fn test_missing_arguments_before_identity() {
        assert!(matches!(
            parse_invite("abc"),
            Err(InviteError::MissingArguments { .. })
        ));
        assert!(matches!(
            parse_invite(""),
            Err(InviteError::MissingArguments { got: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_identity() {
        assert_eq!(
            parse_invite("abc Name link"),
            Err(InviteError::InvalidIdentity("abc".to_string()))
        );
        assert_eq!(
            parse_invite("99999999999999999999 Name 01.01.2030 link"),
            Err(InviteError::InvalidIdentity("99999999999999999999".to_string()))
        );
    }

    #[test]
    fn test_callback_payload() {
        assert_eq!(
            CallbackAction::parse("confirm:1"),
            Some(CallbackAction::Confirm { hr_id: Identity(1) })
        );
        assert_eq!(
            CallbackAction::parse("confirm:-100200"),
            Some(CallbackAction::Confirm { hr_id: Identity(-100200) })
        );
        assert_eq!(CallbackAction::parse("confirm:"), None);
        assert_eq!(CallbackAction::parse("confirm:abc"), None);
        assert_eq!(CallbackAction::parse("cancel_review"), None);
        assert_eq!(
            CallbackAction::Confirm { hr_id: Identity(7) }.encode(),
            "confirm:7"
        );
    }
}

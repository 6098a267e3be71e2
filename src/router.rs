//! # Conversation Router Module
//!
//! Decides, for every inbound event, who gets which message and how the
//! invitation registry changes.
//!
//! ## Flows
//!
//! - Fixed date: HR sends `/invite` with a date, the candidate gets a Confirm
//!   button whose payload names the HR. Confirming works even when the
//!   registry has no entry for the candidate.
//! - Negotiated date: HR sends `/invite` without a date, the candidate answers
//!   with free text which is relayed to the HR found in the registry.
//!
//! Malformed input turns into a chat message for the sender. Delivery
//! failures are logged and never abort routing.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::command_parser::{parse_candidate_id, parse_invite, CallbackAction, Command};
use crate::config::{ResolutionPolicy, RouterConfig};
use crate::dialogue::{validate_date_reply, InterviewState};
use crate::errors::InviteError;
use crate::invitation_model::{Identity, InvitationLink, InviteMode, InviteRequest};
use crate::localization::{get_localization_manager, t_args_lang, t_lang};
use crate::notifier::{Notifier, OutboundMessage};
use crate::registry::InvitationRegistry;

/// Platform-neutral inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A text message, command or not
    Text {
        from: Identity,
        text: String,
        language: Option<String>,
    },
    /// An inline button press
    Callback {
        from: Identity,
        data: String,
        language: Option<String>,
    },
}

/// Why an event produced no messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Free text from an identity without a registry entry
    UnknownCandidate,
    /// Free text from a candidate who should press Confirm instead
    AwaitingConfirmation,
    EmptyText,
    UnknownCallback,
}

/// What routing an event amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Invited {
        candidate: Identity,
        mode: InviteMode,
        /// Whether the candidate actually received the invite
        delivered: bool,
    },
    Rejected(InviteError),
    Confirmed {
        candidate: Identity,
        hr: Identity,
    },
    DateRelayed {
        candidate: Identity,
        hr: Identity,
    },
    DateRejected {
        candidate: Identity,
    },
    Cancelled {
        candidate: Identity,
    },
    NothingToCancel {
        candidate: Identity,
    },
    Listed {
        count: usize,
    },
    Help,
    UnknownCommand,
    Ignored(IgnoreReason),
}

/// The stateful core: routes events between HR and candidates
pub struct Router {
    registry: Arc<InvitationRegistry>,
    notifier: Arc<dyn Notifier>,
    config: RouterConfig,
}

impl Router {
    pub fn new(
        registry: Arc<InvitationRegistry>,
        notifier: Arc<dyn Notifier>,
        config: RouterConfig,
    ) -> Self {
        Self {
            registry,
            notifier,
            config,
        }
    }

    /// Route one inbound event to completion
    pub async fn handle(&self, event: InboundEvent) -> Outcome {
        match event {
            InboundEvent::Text {
                from,
                text,
                language,
            } => match Command::parse(&text) {
                Some(command) => self.handle_command(from, command, language.as_deref()).await,
                None => self.handle_date_reply(from, &text, language.as_deref()).await,
            },
            InboundEvent::Callback {
                from,
                data,
                language,
            } => match CallbackAction::parse(&data) {
                Some(CallbackAction::Confirm { hr_id }) => {
                    self.handle_confirm(from, hr_id, language.as_deref()).await
                }
                None => {
                    debug!(user_id = %from, data = %data, "Ignoring unknown callback payload");
                    Outcome::Ignored(IgnoreReason::UnknownCallback)
                }
            },
        }
    }

    async fn handle_command(
        &self,
        from: Identity,
        command: Command,
        language: Option<&str>,
    ) -> Outcome {
        let lang = self.language_or_default(language);
        match command {
            Command::Start => {
                self.deliver(from, OutboundMessage::text(t_lang("start-text", Some(lang))))
                    .await;
                Outcome::Help
            }
            Command::Help => {
                self.deliver(from, OutboundMessage::text(t_lang("help-text", Some(lang))))
                    .await;
                Outcome::Help
            }
            Command::Invite(args) => self.handle_invite(from, &args, language).await,
            Command::Cancel(args) => self.handle_cancel(from, &args, lang).await,
            Command::Pending => self.handle_pending(from, lang).await,
            Command::Unknown(word) => {
                let text = t_args_lang("unknown-command", &[("command", word.as_str())], Some(lang));
                self.deliver(from, OutboundMessage::text(text)).await;
                Outcome::UnknownCommand
            }
        }
    }

    /// HR issues `/invite`: record the link, invite the candidate, ack the HR
    async fn handle_invite(&self, hr: Identity, args: &str, language: Option<&str>) -> Outcome {
        let hr_lang = self.language_or_default(language);

        let request = match parse_invite(args) {
            Ok(request) => request,
            Err(e) => {
                info!(user_id = %hr, error = %e, "Rejected invite command");
                self.deliver(hr, OutboundMessage::text(invite_error_text(&e, hr_lang)))
                    .await;
                return Outcome::Rejected(e);
            }
        };

        let candidate = request.candidate_id;
        let mode = request.mode();
        let link = InvitationLink::new(hr, &request, language);
        self.registry.put(candidate, link).await;
        info!(user_id = %hr, candidate_id = %candidate, mode = ?mode, "Invitation registered");

        // The candidate has not talked to us yet, so their language is unknown
        let candidate_lang = self.config.default_language.as_str();
        let delivered = self
            .deliver(candidate, invite_message(hr, &request, candidate_lang))
            .await;

        let candidate_str = candidate.to_string();
        let args = [("candidate", candidate_str.as_str()), ("name", request.name.as_str())];
        let ack_key = match (delivered, mode) {
            (false, _) => "invite-delivery-failed",
            (true, InviteMode::FixedDate) => "invite-sent-fixed",
            (true, InviteMode::NegotiatedDate) => "invite-sent-ask",
        };
        self.deliver(hr, OutboundMessage::text(t_args_lang(ack_key, &args, Some(hr_lang))))
            .await;

        Outcome::Invited {
            candidate,
            mode,
            delivered,
        }
    }

    /// Candidate pressed Confirm on a fixed-date invite.
    ///
    /// The payload HR is always notified. The registry entry is only treated
    /// as the same invitation, and resolved, when it is a fixed-date link
    /// owned by that HR; a newer invitation from someone else is left alone.
    async fn handle_confirm(
        &self,
        candidate: Identity,
        payload_hr: Identity,
        language: Option<&str>,
    ) -> Outcome {
        let link = self
            .registry
            .get(candidate)
            .await
            .filter(|link| link.mode == InviteMode::FixedDate && link.hr_id == payload_hr);

        if let Some(link) = &link {
            self.resolve(candidate, link).await;
        } else {
            debug!(candidate_id = %candidate, hr_id = %payload_hr, "Confirmation without matching registry entry");
        }

        let candidate_lang = self.language_or_default(language);
        self.deliver(
            candidate,
            OutboundMessage::text(t_lang("confirm-thanks", Some(candidate_lang))),
        )
        .await;

        let candidate_str = candidate.to_string();
        let notice = match &link {
            Some(link) => t_args_lang(
                "confirm-hr-notice",
                &[
                    ("candidate", candidate_str.as_str()),
                    ("name", link.candidate_name.as_str()),
                ],
                Some(self.language_or_default(link.hr_language.as_deref())),
            ),
            None => t_args_lang(
                "confirm-hr-notice-anonymous",
                &[("candidate", candidate_str.as_str())],
                Some(self.config.default_language.as_str()),
            ),
        };
        self.deliver(payload_hr, OutboundMessage::text(notice)).await;

        info!(candidate_id = %candidate, hr_id = %payload_hr, "Interview confirmed");
        Outcome::Confirmed {
            candidate,
            hr: payload_hr,
        }
    }

    /// Free text from a candidate: relay it as a proposed date
    async fn handle_date_reply(
        &self,
        candidate: Identity,
        text: &str,
        language: Option<&str>,
    ) -> Outcome {
        let link = self.registry.get(candidate).await;

        let link = match (InterviewState::from_link(link.as_ref()), link) {
            (InterviewState::AwaitingDate, Some(link)) => link,
            (InterviewState::AwaitingConfirmation, _) => {
                debug!(user_id = %candidate, "Ignoring text from candidate awaiting confirmation");
                return Outcome::Ignored(IgnoreReason::AwaitingConfirmation);
            }
            _ => {
                debug!(user_id = %candidate, "Ignoring text from unknown candidate");
                return Outcome::Ignored(IgnoreReason::UnknownCandidate);
            }
        };

        let candidate_lang = self.language_or_default(language);
        let date = match validate_date_reply(text, self.config.strict_date_replies) {
            Ok(date) => date,
            Err("empty") => return Outcome::Ignored(IgnoreReason::EmptyText),
            Err(_) => {
                self.deliver(
                    candidate,
                    OutboundMessage::text(t_lang("date-format-hint", Some(candidate_lang))),
                )
                .await;
                return Outcome::DateRejected { candidate };
            }
        };

        let candidate_str = candidate.to_string();
        let proposal = t_args_lang(
            "date-proposed",
            &[
                ("candidate", candidate_str.as_str()),
                ("name", link.candidate_name.as_str()),
                ("date", date.as_str()),
            ],
            Some(self.language_or_default(link.hr_language.as_deref())),
        );
        self.deliver(link.hr_id, OutboundMessage::text(proposal)).await;
        self.deliver(
            candidate,
            OutboundMessage::text(t_lang("date-received", Some(candidate_lang))),
        )
        .await;

        self.resolve(candidate, &link).await;

        info!(candidate_id = %candidate, hr_id = %link.hr_id, "Proposed date relayed");
        Outcome::DateRelayed {
            candidate,
            hr: link.hr_id,
        }
    }

    /// HR withdraws one of its own pending invitations
    async fn handle_cancel(&self, hr: Identity, args: &str, lang: &str) -> Outcome {
        let Some(token) = args.split_whitespace().next() else {
            self.deliver(hr, OutboundMessage::text(t_lang("cancel-usage", Some(lang))))
                .await;
            return Outcome::Rejected(InviteError::MissingArguments {
                expected: 1,
                got: 0,
            });
        };

        let candidate = match parse_candidate_id(token) {
            Ok(candidate) => candidate,
            Err(e) => {
                self.deliver(hr, OutboundMessage::text(invite_error_text(&e, lang)))
                    .await;
                return Outcome::Rejected(e);
            }
        };

        let candidate_str = candidate.to_string();
        let args = [("candidate", candidate_str.as_str())];

        if self.registry.remove_if_owned(candidate, hr).await.is_none() {
            self.deliver(
                hr,
                OutboundMessage::text(t_args_lang("cancel-not-found", &args, Some(lang))),
            )
            .await;
            return Outcome::NothingToCancel { candidate };
        }

        info!(user_id = %hr, candidate_id = %candidate, "Invitation withdrawn");
        self.deliver(
            hr,
            OutboundMessage::text(t_args_lang("cancel-done", &args, Some(lang))),
        )
        .await;
        self.deliver(
            candidate,
            OutboundMessage::text(t_lang(
                "cancel-candidate-notice",
                Some(self.config.default_language.as_str()),
            )),
        )
        .await;

        Outcome::Cancelled { candidate }
    }

    /// HR asks which candidates have not answered yet
    async fn handle_pending(&self, hr: Identity, lang: &str) -> Outcome {
        let pending = self.registry.pending_for(hr).await;

        if pending.is_empty() {
            self.deliver(hr, OutboundMessage::text(t_lang("pending-none", Some(lang))))
                .await;
            return Outcome::Listed { count: 0 };
        }

        let mut lines = vec![t_lang("pending-title", Some(lang))];
        for (candidate, link) in &pending {
            let candidate_str = candidate.to_string();
            let mode = match link.mode {
                InviteMode::FixedDate => t_lang("mode-fixed", Some(lang)),
                InviteMode::NegotiatedDate => t_lang("mode-ask", Some(lang)),
            };
            let invited_at = link.invited_at.format("%d.%m.%Y %H:%M UTC").to_string();
            lines.push(t_args_lang(
                "pending-entry",
                &[
                    ("candidate", candidate_str.as_str()),
                    ("name", link.candidate_name.as_str()),
                    ("mode", mode.as_str()),
                    ("invited_at", invited_at.as_str()),
                ],
                Some(lang),
            ));
        }

        self.deliver(hr, OutboundMessage::text(lines.join("\n"))).await;
        Outcome::Listed {
            count: pending.len(),
        }
    }

    /// Apply the resolution policy once a flow reached its end.
    ///
    /// Only the link the flow acted on is removed; a re-invite that landed in
    /// the meantime stays.
    async fn resolve(&self, candidate: Identity, resolved: &InvitationLink) {
        if self.config.resolution == ResolutionPolicy::RemoveOnResolve
            && self
                .registry
                .remove_if(candidate, |current| current == resolved)
                .await
                .is_some()
        {
            debug!(candidate_id = %candidate, "Invitation resolved and removed");
        }
    }

    async fn deliver(&self, to: Identity, message: OutboundMessage) -> bool {
        match self.notifier.send(to, message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(recipient = %to, error = %e, "Message delivery failed");
                false
            }
        }
    }

    /// Loaded language for a Telegram code, else the configured default
    fn language_or_default(&self, language: Option<&str>) -> &str {
        language
            .and_then(|code| get_localization_manager().supported_language(code))
            .unwrap_or(self.config.default_language.as_str())
    }
}

fn invite_error_text(error: &InviteError, lang: &str) -> String {
    match error {
        InviteError::MissingArguments { .. } => t_lang("error-invite-usage", Some(lang)),
        InviteError::InvalidIdentity(value) => {
            t_args_lang("error-candidate-id", &[("value", value.as_str())], Some(lang))
        }
    }
}

fn invite_message(hr: Identity, request: &InviteRequest, lang: &str) -> OutboundMessage {
    match &request.date {
        Some(date) => OutboundMessage::text(t_args_lang(
            "invite-candidate-fixed",
            &[
                ("name", request.name.as_str()),
                ("date", date.as_str()),
                ("link", request.link.as_str()),
            ],
            Some(lang),
        ))
        .with_button(
            t_lang("invite-confirm-button", Some(lang)),
            CallbackAction::Confirm { hr_id: hr }.encode(),
        ),
        None => OutboundMessage::text(t_args_lang(
            "invite-candidate-ask",
            &[
                ("name", request.name.as_str()),
                ("link", request.link.as_str()),
            ],
            Some(lang),
        )),
    }
}

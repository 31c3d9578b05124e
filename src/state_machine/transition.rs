//! Pure state transition function
//!
//! Every intent and every remote outcome passes through [`transition`]. It
//! never performs I/O; remote calls and logging leave as [`Effect`]s.

use super::state::{ChatSession, ConversationState, Message, Mode, PendingConsent};
use super::{Effect, Event, Reply, WidgetContext, WidgetState};
use thiserror::Error;

/// Bot message appended after the visitor agrees to have the message saved
pub const CONSENT_GIVEN_REPLY: &str = "Thank you! Your message will be used for improvement.";
/// Bot message appended after the visitor declines
pub const CONSENT_DECLINED_REPLY: &str = "Understood! Your message won't be saved.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: WidgetState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: WidgetState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// State changed; subscribers need a new snapshot
    pub fn changed(state: WidgetState) -> Self {
        Self::new(state).with_effect(Effect::PublishView)
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Intents rejected because their precondition does not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Chat has not been entered yet")]
    NotInChat,
    #[error("Chat is already open")]
    AlreadyChatting,
    #[error("No message is waiting for consent")]
    NoPendingConsent,
    #[error("History is not open")]
    HistoryNotVisible,
    #[error("Unknown session: {0}")]
    UnknownSession(usize),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs. The input state
/// is never modified; a rejected intent leaves the caller's state as it was.
#[allow(clippy::too_many_lines)]
pub fn transition(
    state: &WidgetState,
    context: &WidgetContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.mode, event) {
        // ============================================================
        // Entering the chat
        // ============================================================
        (Mode::Landing, Event::EnterChat) => {
            let mut next = state.clone();
            next.mode = Mode::Chatting;
            Ok(TransitionResult::changed(next))
        }
        (Mode::Chatting, Event::EnterChat) => Err(TransitionError::AlreadyChatting),

        // ============================================================
        // Sending
        // ============================================================
        (Mode::Chatting, Event::SendMessage { text }) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                // Blank input: no message, no responder call
                return Ok(TransitionResult::new(state.clone()));
            }

            let mut next = state.clone();
            next.live.messages.push(Message::user(trimmed));
            next.draft.clear();
            let tag = next.issue_tag();

            Ok(TransitionResult::changed(next).with_effect(Effect::call_responder(tag, trimmed)))
        }

        // ============================================================
        // Responder outcomes
        // ============================================================
        (_, Event::ResponderReplied { tag, .. }) if !state.is_current(tag) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::DropStaleReply { tag }))
        }

        (_, Event::ResponderReplied {
            original, reply, ..
        }) => match reply {
            Reply::Unhandled => {
                let mut next = state.clone();
                let previous = next.live.pending_consent.replace(PendingConsent {
                    raw_text: original,
                });
                let mut result = TransitionResult::changed(next);
                if let Some(discarded) = previous {
                    result = result.with_effect(Effect::ReplaceConsent {
                        discarded: discarded.raw_text,
                    });
                }
                Ok(result)
            }
            Reply::Text(text) => {
                let mut next = state.clone();
                next.live.messages.push(Message::bot(text));
                Ok(TransitionResult::changed(next))
            }
            Reply::Empty => Ok(TransitionResult::new(state.clone())),
        },

        (_, Event::ResponderFailed { message, .. }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::responder_failure(message)))
        }

        // ============================================================
        // Consent
        // ============================================================
        (_, Event::ConsentAnswered { consent }) => {
            let Some(pending) = state.live.pending_consent.clone() else {
                return Err(TransitionError::NoPendingConsent);
            };

            let mut next = state.clone();
            next.live.pending_consent = None;
            let confirmation = if consent {
                CONSENT_GIVEN_REPLY
            } else {
                CONSENT_DECLINED_REPLY
            };
            next.live.messages.push(Message::bot(confirmation));

            let result = TransitionResult::changed(next);
            if consent {
                Ok(result.with_effect(Effect::RecordConsent {
                    text: pending.raw_text,
                }))
            } else {
                Ok(result)
            }
        }

        (_, Event::RecorderAcknowledged) => Ok(TransitionResult::new(state.clone())),

        (_, Event::RecorderFailed { message }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::recorder_failure(message)))
        }

        // ============================================================
        // Sessions and history
        // ============================================================
        (Mode::Chatting, Event::StartNewChat) => {
            let mut next = state.clone();

            if !next.live.is_empty() {
                let label = match next.session_name.trim() {
                    "" => context.default_session_label.clone(),
                    name => name.to_string(),
                };
                let snapshot = std::mem::take(&mut next.live.messages);
                next.archive.push(ChatSession {
                    label,
                    messages: snapshot,
                });
            }

            next.live = ConversationState::default();
            next.draft.clear();
            next.session_name.clear();
            next.selected = None;
            next.history_visible = false;
            next.epoch += 1;

            Ok(TransitionResult::changed(next))
        }

        (_, Event::LoadSession { id }) => {
            if state.session(id).is_none() {
                return Err(TransitionError::UnknownSession(id.0));
            }
            let mut next = state.clone();
            next.selected = Some(id);
            Ok(TransitionResult::changed(next))
        }

        (_, Event::ShowLiveConversation) => {
            let mut next = state.clone();
            next.selected = None;
            Ok(TransitionResult::changed(next))
        }

        (Mode::Chatting, Event::ToggleHistory) => {
            let mut next = state.clone();
            next.history_visible = !next.history_visible;
            Ok(TransitionResult::changed(next))
        }

        (_, Event::CloseHistory) => {
            if !state.history_visible {
                return Err(TransitionError::HistoryNotVisible);
            }
            let mut next = state.clone();
            next.history_visible = false;
            Ok(TransitionResult::changed(next))
        }

        // ============================================================
        // Inputs and header menu
        // ============================================================
        (_, Event::EditDraft { text }) => {
            let mut next = state.clone();
            next.draft = text;
            Ok(TransitionResult::changed(next))
        }

        (_, Event::EditSessionName { name }) => {
            let mut next = state.clone();
            next.session_name = name;
            Ok(TransitionResult::changed(next))
        }

        (Mode::Chatting, Event::ToggleMenu) => {
            let mut next = state.clone();
            next.menu_open = !next.menu_open;
            Ok(TransitionResult::changed(next))
        }

        (Mode::Chatting, Event::SelectMenuEntry { entry }) => {
            let mut next = state.clone();
            next.menu_open = false;
            Ok(TransitionResult::changed(next).with_effect(Effect::LogMenuSelection { entry }))
        }

        // ============================================================
        // Chat-only intents on the landing screen
        // ============================================================
        (
            Mode::Landing,
            Event::SendMessage { .. }
            | Event::StartNewChat
            | Event::ToggleHistory
            | Event::ToggleMenu
            | Event::SelectMenuEntry { .. },
        ) => Err(TransitionError::NotInChat),
    }
}

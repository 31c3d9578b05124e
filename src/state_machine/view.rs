//! Serializable snapshot of what the widget shows

use super::state::{Message, Mode, SessionId, WidgetState};
use super::WidgetContext;
use serde::Serialize;

/// One row of the session list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub label: String,
    pub message_count: usize,
}

/// Everything a front-end needs to render the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetView {
    pub mode: Mode,
    pub display_name: String,
    pub history_visible: bool,
    pub menu_open: bool,
    pub awaiting_consent: bool,
    /// Text awaiting the consent decision, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_prompt: Option<String>,
    pub draft: String,
    pub session_name: String,
    /// The live conversation
    pub messages: Vec<Message>,
    /// What the history panel shows
    pub transcript: Vec<Message>,
    pub sessions: Vec<SessionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_session: Option<SessionId>,
}

impl WidgetView {
    pub fn of(state: &WidgetState, context: &WidgetContext) -> Self {
        Self {
            mode: state.mode,
            display_name: context.display_name.clone(),
            history_visible: state.history_visible,
            menu_open: state.menu_open,
            awaiting_consent: state.awaiting_consent(),
            consent_prompt: state
                .live
                .pending_consent
                .as_ref()
                .map(|p| p.raw_text.clone()),
            draft: state.draft.clone(),
            session_name: state.session_name.clone(),
            messages: state.live.messages.clone(),
            transcript: state.displayed_transcript().to_vec(),
            sessions: state
                .archive
                .iter()
                .enumerate()
                .map(|(i, s)| SessionSummary {
                    id: SessionId(i),
                    label: s.label.clone(),
                    message_count: s.messages.len(),
                })
                .collect(),
            selected_session: state.selected,
        }
    }
}

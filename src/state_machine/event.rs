//! Events that can occur in the widget

use crate::state_machine::state::{MenuEntry, RequestTag, SessionId};

/// What the responder answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The sentinel: the responder cannot handle the message
    Unhandled,
    /// A bot reply, shown verbatim
    Text(String),
    /// No usable message in the reply body
    Empty,
}

/// Sentinel value the responder returns for messages it cannot handle
pub const UNHANDLED_SENTINEL: &str = "unhandled";

impl Reply {
    pub fn from_message(message: Option<String>) -> Self {
        match message {
            Some(m) if m == UNHANDLED_SENTINEL => Reply::Unhandled,
            Some(m) if !m.is_empty() => Reply::Text(m),
            _ => Reply::Empty,
        }
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User intents
    EnterChat,
    ToggleHistory,
    CloseHistory,
    SendMessage {
        text: String,
    },
    EditDraft {
        text: String,
    },
    EditSessionName {
        name: String,
    },
    ConsentAnswered {
        consent: bool,
    },
    StartNewChat,
    LoadSession {
        id: SessionId,
    },
    ShowLiveConversation,
    ToggleMenu,
    SelectMenuEntry {
        entry: MenuEntry,
    },

    // Responder events
    ResponderReplied {
        tag: RequestTag,
        /// The user text the call was made with
        original: String,
        reply: Reply,
    },
    ResponderFailed {
        tag: RequestTag,
        message: String,
    },

    // Consent recorder events
    RecorderAcknowledged,
    RecorderFailed {
        message: String,
    },
}

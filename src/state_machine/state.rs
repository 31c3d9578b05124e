//! Widget state types

use serde::{Deserialize, Serialize};

// ============================================================================
// Messages and Sessions
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    Bot,
}

/// A single transcript entry. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub origin: Origin,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Bot,
            text: text.into(),
        }
    }
}

/// Position of a session in the archive.
///
/// The archive is append-only, so an id stays valid for the life of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub usize);

/// An archived conversation: a label plus an owned copy of its messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub label: String,
    pub messages: Vec<Message>,
}

// ============================================================================
// Live Conversation
// ============================================================================

/// A message the responder could not handle, waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConsent {
    pub raw_text: String,
}

/// Identifies one outbound responder call.
///
/// `epoch` counts conversation resets; `seq` is monotonic for the life of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTag {
    pub epoch: u64,
    pub seq: u64,
}

/// The in-progress, not yet archived conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub pending_consent: Option<PendingConsent>,
}

impl ConversationState {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

// ============================================================================
// Widget State
// ============================================================================

/// Primary mode of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Welcome screen, chat not entered yet
    #[default]
    Landing,
    Chatting,
}

/// Entries of the header menu. None of them has behavior yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuEntry {
    Login,
    Register,
    Feedback,
}

impl MenuEntry {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuEntry::Login => "login",
            MenuEntry::Register => "register",
            MenuEntry::Feedback => "feedback",
        }
    }
}

impl std::str::FromStr for MenuEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(MenuEntry::Login),
            "register" => Ok(MenuEntry::Register),
            "feedback" => Ok(MenuEntry::Feedback),
            other => Err(format!("Unknown menu entry: {other}")),
        }
    }
}

/// Everything the controller owns.
///
/// `history_visible` and the pending consent are orthogonal to `mode`; the
/// consent flag is derived from `live.pending_consent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState {
    pub mode: Mode,
    pub history_visible: bool,
    pub menu_open: bool,
    pub live: ConversationState,
    pub archive: Vec<ChatSession>,
    /// Non-owning pointer into `archive` for the history view
    pub selected: Option<SessionId>,
    pub draft: String,
    pub session_name: String,
    /// Incremented by every conversation reset
    pub epoch: u64,
    /// Sequence number handed to the next responder call
    pub next_seq: u64,
}

impl WidgetState {
    pub fn awaiting_consent(&self) -> bool {
        self.live.pending_consent.is_some()
    }

    pub fn session(&self, id: SessionId) -> Option<&ChatSession> {
        self.archive.get(id.0)
    }

    /// Messages the history view shows: the selected session, or the live
    /// conversation when nothing is selected
    pub fn displayed_transcript(&self) -> &[Message] {
        self.selected
            .and_then(|id| self.session(id))
            .map_or(self.live.messages.as_slice(), |s| s.messages.as_slice())
    }

    /// Tag for a new responder call issued by the live conversation
    pub fn issue_tag(&mut self) -> RequestTag {
        let tag = RequestTag {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        tag
    }

    /// Whether a reply carrying `tag` still belongs to the live conversation
    pub fn is_current(&self, tag: RequestTag) -> bool {
        tag.epoch == self.epoch
    }
}

/// Immutable settings the transitions consult
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetContext {
    pub display_name: String,
    pub default_session_label: String,
}

pub const DEFAULT_DISPLAY_NAME: &str = "Hello User";
pub const DEFAULT_SESSION_LABEL: &str = "Unnamed Session";

impl Default for WidgetContext {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            default_session_label: DEFAULT_SESSION_LABEL.to_string(),
        }
    }
}

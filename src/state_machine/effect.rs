//! Effects produced by state transitions

use crate::remote::RemoteCall;
use crate::state_machine::state::{MenuEntry, RequestTag};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the responder about a user message (spawns as background task)
    CallResponder { tag: RequestTag, text: String },

    /// Hand a consented message to the consent recorder (fire-and-forget)
    RecordConsent { text: String },

    /// Log a failed remote call. Never shown in the transcript.
    ReportFailure { call: RemoteCall, message: String },

    /// A reply arrived for a conversation that has since been archived
    DropStaleReply { tag: RequestTag },

    /// A second unhandled reply replaced the pending consent prompt
    ReplaceConsent { discarded: String },

    /// Header menu entry picked; entries are stubs that only log
    LogMenuSelection { entry: MenuEntry },

    /// Publish a fresh view snapshot to subscribers
    PublishView,
}

impl Effect {
    pub fn call_responder(tag: RequestTag, text: impl Into<String>) -> Self {
        Effect::CallResponder {
            tag,
            text: text.into(),
        }
    }

    pub fn responder_failure(message: impl Into<String>) -> Self {
        Effect::ReportFailure {
            call: RemoteCall::Responder,
            message: message.into(),
        }
    }

    pub fn recorder_failure(message: impl Into<String>) -> Self {
        Effect::ReportFailure {
            call: RemoteCall::ConsentRecorder,
            message: message.into(),
        }
    }
}

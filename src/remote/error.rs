//! Remote call error types

use std::fmt;
use thiserror::Error;

/// Which collaborator a call went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    Responder,
    ConsentRecorder,
}

impl RemoteCall {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteCall::Responder => "responder",
            RemoteCall::ConsentRecorder => "consent_recorder",
        }
    }
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only remote error kind: transport failure, bad status or bad body
#[derive(Debug, Clone, Error)]
#[error("{call} call failed: {message}")]
pub struct RemoteCallFailure {
    pub call: RemoteCall,
    pub message: String,
    /// HTTP status, when the remote answered at all
    pub status: Option<u16>,
}

impl RemoteCallFailure {
    pub fn new(call: RemoteCall, message: impl Into<String>) -> Self {
        Self {
            call,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn responder(message: impl Into<String>) -> Self {
        Self::new(RemoteCall::Responder, message)
    }

    #[cfg(test)]
    pub fn consent_recorder(message: impl Into<String>) -> Self {
        Self::new(RemoteCall::ConsentRecorder, message)
    }

    pub(crate) fn from_reqwest(call: RemoteCall, err: &reqwest::Error) -> Self {
        let failure = Self::new(call, err.to_string());
        match err.status() {
            Some(status) => failure.with_status(status.as_u16()),
            None => failure,
        }
    }
}

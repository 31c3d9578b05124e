//! API request and response types

use serde::{Deserialize, Serialize};

/// Request carrying free text (a message or a draft)
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Request to edit the label of the live conversation
#[derive(Debug, Deserialize)]
pub struct SessionNameRequest {
    pub name: String,
}

/// Answer to the consent prompt
#[derive(Debug, Deserialize)]
pub struct ConsentRequest {
    pub consent: bool,
}

/// Response for intents handed to the runtime
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

impl QueuedResponse {
    pub fn queued() -> Self {
        Self { queued: true }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

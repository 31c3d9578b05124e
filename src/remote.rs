//! Remote collaborators
//!
//! The responder answers visitor messages; the consent recorder stores
//! messages the visitor agreed to share. Both are opaque services.

mod error;
mod http;

pub use error::{RemoteCall, RemoteCallFailure};
pub use http::{http_client, HttpConsentRecorder, HttpResponder};

use crate::runtime::{ConsentRecorder, Responder};
use crate::state_machine::Reply;
use async_trait::async_trait;
use std::sync::Arc;

/// Logging wrapper for the responder
pub struct LoggingResponder {
    inner: Arc<dyn Responder>,
}

impl LoggingResponder {
    pub fn new(inner: Arc<dyn Responder>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Responder for LoggingResponder {
    async fn get_response(&self, message: &str) -> Result<Reply, RemoteCallFailure> {
        let start = std::time::Instant::now();
        let result = self.inner.get_response(message).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    unhandled = matches!(reply, Reply::Unhandled),
                    "Responder call completed"
                );
            }
            // Failure itself is reported once by the runtime
            Err(e) => {
                tracing::debug!(
                    duration_ms = %duration.as_millis(),
                    status = ?e.status,
                    "Responder call returned an error"
                );
            }
        }

        result
    }
}

/// Logging wrapper for the consent recorder
pub struct LoggingRecorder {
    inner: Arc<dyn ConsentRecorder>,
}

impl LoggingRecorder {
    pub fn new(inner: Arc<dyn ConsentRecorder>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ConsentRecorder for LoggingRecorder {
    async fn save_message(&self, message: &str) -> Result<(), RemoteCallFailure> {
        let start = std::time::Instant::now();
        let result = self.inner.save_message(message).await;
        let duration = start.elapsed();

        match &result {
            Ok(()) => {
                tracing::info!(duration_ms = %duration.as_millis(), "Consented message saved");
            }
            Err(e) => {
                tracing::debug!(
                    duration_ms = %duration.as_millis(),
                    status = ?e.status,
                    "Consent recorder returned an error"
                );
            }
        }

        result
    }
}

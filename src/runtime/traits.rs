//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::remote::RemoteCallFailure;
use crate::state_machine::Reply;
use async_trait::async_trait;
use std::sync::Arc;

/// Remote service that answers visitor messages
#[async_trait]
pub trait Responder: Send + Sync {
    /// Ask for a reply to `message`
    async fn get_response(&self, message: &str) -> Result<Reply, RemoteCallFailure>;
}

/// Remote service that keeps messages the visitor consented to share
#[async_trait]
pub trait ConsentRecorder: Send + Sync {
    /// Store `message`; `Ok` is the acknowledgement
    async fn save_message(&self, message: &str) -> Result<(), RemoteCallFailure>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Responder + ?Sized> Responder for Arc<T> {
    async fn get_response(&self, message: &str) -> Result<Reply, RemoteCallFailure> {
        (**self).get_response(message).await
    }
}

#[async_trait]
impl<T: ConsentRecorder + ?Sized> ConsentRecorder for Arc<T> {
    async fn save_message(&self, message: &str) -> Result<(), RemoteCallFailure> {
        (**self).save_message(message).await
    }
}

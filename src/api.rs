//! HTTP API for the chat widget
//!
//! Each endpoint turns a request into one widget intent. State changes are
//! observed through `GET /api/widget` or the SSE stream.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::runtime::WidgetHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub widget: WidgetHandle,
}

impl AppState {
    pub fn new(widget: WidgetHandle) -> Self {
        Self { widget }
    }
}

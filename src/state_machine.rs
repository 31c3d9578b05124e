//! Core widget state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;
mod view;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, Reply};
pub use state::{WidgetContext, WidgetState};
pub use transition::transition;
pub use view::WidgetView;

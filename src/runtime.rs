//! Runtime for the widget controller
//!
//! One task owns the [`WidgetState`](crate::state_machine::WidgetState). Intents
//! and remote outcomes reach it as events over a single channel, so updates are
//! serialized without locks.

mod executor;
pub mod traits;


pub use executor::WidgetRuntime;
pub use traits::*;

use crate::state_machine::{Event, WidgetContext, WidgetState, WidgetView};
use tokio::sync::{broadcast, mpsc, watch};

/// Events sent to view subscribers
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// Fresh snapshot after a state change
    View { view: WidgetView },
    /// An intent was rejected; not part of the transcript
    Notice { message: String },
}

/// Handle to interact with the running widget
#[derive(Clone)]
pub struct WidgetHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<ViewEvent>,
    view_rx: watch::Receiver<WidgetView>,
}

impl WidgetHandle {
    /// Start a runtime on the current tokio runtime and return its handle.
    ///
    /// The runtime stops once every handle is dropped; remote calls still in
    /// flight at that point have their outcome discarded.
    pub fn spawn<R, C>(context: WidgetContext, responder: R, recorder: C) -> Self
    where
        R: Responder + 'static,
        C: ConsentRecorder + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let state = WidgetState::default();
        let (view_tx, view_rx) = watch::channel(WidgetView::of(&state, &context));

        let runtime = WidgetRuntime::new(
            context,
            state,
            responder,
            recorder,
            event_rx,
            event_tx.downgrade(),
            broadcast_tx.clone(),
            view_tx,
        );

        tokio::spawn(async move {
            runtime.run().await;
        });

        Self {
            event_tx,
            broadcast_tx,
            view_rx,
        }
    }

    /// Queue an event for the widget
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {e}"))
    }

    /// Subscribe to view updates and notices
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Latest published snapshot
    pub fn current_view(&self) -> WidgetView {
        self.view_rx.borrow().clone()
    }
}

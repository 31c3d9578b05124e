//! Widget runtime executor

use super::traits::{ConsentRecorder, Responder};
use super::ViewEvent;

use crate::state_machine::{transition, Effect, Event, WidgetContext, WidgetState, WidgetView};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Generic widget runtime that can work with any responder and recorder implementation
pub struct WidgetRuntime<R, C>
where
    R: Responder + 'static,
    C: ConsentRecorder + 'static,
{
    context: WidgetContext,
    state: WidgetState,
    responder: Arc<R>,
    recorder: Arc<C>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so background calls do not keep the runtime alive
    event_tx: mpsc::WeakSender<Event>,
    broadcast_tx: broadcast::Sender<ViewEvent>,
    view_tx: watch::Sender<WidgetView>,
}

impl<R, C> WidgetRuntime<R, C>
where
    R: Responder + 'static,
    C: ConsentRecorder + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: WidgetContext,
        state: WidgetState,
        responder: R,
        recorder: C,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::WeakSender<Event>,
        broadcast_tx: broadcast::Sender<ViewEvent>,
        view_tx: watch::Sender<WidgetView>,
    ) -> Self {
        Self {
            context,
            state,
            responder: Arc::new(responder),
            recorder: Arc::new(recorder),
            event_rx,
            event_tx,
            broadcast_tx,
            view_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting widget runtime");

        // Process events in a loop until every handle is gone
        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        tracing::info!("Widget runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        // Pure state transition
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                // Rejections are user-facing notices, never transcript entries
                tracing::debug!(error = %e, "Intent rejected");
                let _ = self.broadcast_tx.send(ViewEvent::Notice {
                    message: e.to_string(),
                });
                return;
            }
        };

        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    /// Execute an effect. Remote calls run in the background and report back as events.
    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::CallResponder { tag, text } => {
                tracing::info!(seq = tag.seq, epoch = tag.epoch, "Calling responder (background)");
                let responder = self.responder.clone();
                self.dispatch(async move {
                    match responder.get_response(&text).await {
                        Ok(reply) => Event::ResponderReplied {
                            tag,
                            original: text,
                            reply,
                        },
                        Err(e) => Event::ResponderFailed {
                            tag,
                            message: e.to_string(),
                        },
                    }
                });
            }

            Effect::RecordConsent { text } => {
                tracing::info!("Recording consented message (background)");
                let recorder = self.recorder.clone();
                self.dispatch(async move {
                    match recorder.save_message(&text).await {
                        Ok(()) => Event::RecorderAcknowledged,
                        Err(e) => Event::RecorderFailed {
                            message: e.to_string(),
                        },
                    }
                });
            }

            Effect::ReportFailure { call, message } => {
                // Logged only, never shown in the transcript
                tracing::warn!(call = %call, error = %message, "Remote call failed");
            }

            Effect::DropStaleReply { tag } => {
                tracing::debug!(
                    seq = tag.seq,
                    epoch = tag.epoch,
                    current_epoch = self.state.epoch,
                    "Dropping reply for an archived conversation"
                );
            }

            Effect::ReplaceConsent { discarded } => {
                tracing::info!(
                    discarded_len = discarded.len(),
                    "Newer unhandled message replaced the pending consent prompt"
                );
            }

            Effect::LogMenuSelection { entry } => {
                tracing::info!(entry = entry.as_str(), "Menu entry selected (not implemented)");
            }

            Effect::PublishView => {
                let view = WidgetView::of(&self.state, &self.context);
                self.view_tx.send_replace(view.clone());
                let _ = self.broadcast_tx.send(ViewEvent::View { view });
            }
        }
    }

    /// Run `call` on a background task and feed its event back to the runtime.
    ///
    /// If the runtime is gone by the time the call finishes, the event is dropped.
    fn dispatch<F>(&self, call: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = call.await;
            match event_tx.upgrade() {
                Some(tx) => {
                    let _ = tx.send(event).await;
                }
                None => {
                    tracing::debug!("Widget stopped before the remote call finished, discarding outcome");
                }
            }
        });
    }
}

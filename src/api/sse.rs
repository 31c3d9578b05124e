//! Server-Sent Events support

use crate::runtime::ViewEvent;
use crate::state_machine::WidgetView;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Snapshot first, then every broadcast view event
pub fn sse_stream(
    init_view: WidgetView,
    broadcast_rx: tokio::sync::broadcast::Receiver<ViewEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move {
        Ok(to_sse_event(
            "init",
            json!({ "type": "init", "view": init_view }),
        ))
    });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(view_event_to_axum(event))),
        // Lagged subscribers catch up with the next snapshot
        Err(_) => None,
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn view_event_to_axum(event: ViewEvent) -> Event {
    match event {
        ViewEvent::View { view } => to_sse_event("view", json!({ "type": "view", "view": view })),
        ViewEvent::Notice { message } => to_sse_event(
            "notice",
            json!({ "type": "notice", "message": message }),
        ),
    }
}

fn to_sse_event(event_type: &str, data: serde_json::Value) -> Event {
    Event::default().event(event_type).data(data.to_string())
}

//! Chat widget - conversation controller behind an HTTP API
//!
//! A visitor exchanges messages with a remote responder. Messages the
//! responder cannot handle may be shared with a consent recorder.

mod api;
mod config;
mod remote;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use config::WidgetConfig;
use remote::{http_client, HttpConsentRecorder, HttpResponder, LoggingRecorder, LoggingResponder};
use runtime::WidgetHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_widget=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = WidgetConfig::from_env();
    tracing::info!(
        responder_url = %config.responder_url,
        timeout_secs = config.http_timeout.as_secs(),
        "Configured remote collaborators"
    );

    // Both collaborators share one connection pool
    let client = http_client(config.http_timeout)?;
    let responder = LoggingResponder::new(Arc::new(HttpResponder::new(
        client.clone(),
        &config.responder_url,
    )));
    let recorder = LoggingRecorder::new(Arc::new(HttpConsentRecorder::new(
        client,
        &config.responder_url,
    )));

    let widget = WidgetHandle::spawn(config.context(), responder, recorder);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(AppState::new(widget))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Chat widget listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

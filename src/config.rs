//! Widget configuration from environment variables

use crate::state_machine::state::{DEFAULT_DISPLAY_NAME, DEFAULT_SESSION_LABEL};
use crate::state_machine::WidgetContext;
use std::time::Duration;

const DEFAULT_RESPONDER_URL: &str = "http://127.0.0.1:5002";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration for the widget server and its remote collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Base URL serving `/get-response` and `/save-message`
    pub responder_url: String,
    pub port: u16,
    pub http_timeout: Duration,
    pub display_name: String,
    pub default_session_label: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            responder_url: DEFAULT_RESPONDER_URL.to_string(),
            port: DEFAULT_PORT,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            default_session_label: DEFAULT_SESSION_LABEL.to_string(),
        }
    }
}

impl WidgetConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("CHAT_WIDGET_PORT").and_then(|v| match v.trim().parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                tracing::warn!(value = %v, "Invalid CHAT_WIDGET_PORT, using default");
                None
            }
        });
        let timeout_secs =
            non_empty("CHAT_WIDGET_HTTP_TIMEOUT_SECS").and_then(|v| match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    tracing::warn!(value = %v, "Invalid CHAT_WIDGET_HTTP_TIMEOUT_SECS, using default");
                    None
                }
            });

        Self {
            responder_url: non_empty("CHAT_WIDGET_RESPONDER_URL").unwrap_or(defaults.responder_url),
            port: port.unwrap_or(defaults.port),
            http_timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            display_name: non_empty("CHAT_WIDGET_DISPLAY_NAME").unwrap_or(defaults.display_name),
            default_session_label: non_empty("CHAT_WIDGET_DEFAULT_SESSION_LABEL")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.default_session_label),
        }
    }

    /// Display settings handed to the state machine
    pub fn context(&self) -> WidgetContext {
        WidgetContext {
            display_name: self.display_name.clone(),
            default_session_label: self.default_session_label.clone(),
        }
    }
}

//! HTTP implementations of the responder and the consent recorder
//!
//! Both speak JSON `{"message": "..."}` against the same base URL.

use super::{RemoteCall, RemoteCallFailure};
use crate::runtime::{ConsentRecorder, Responder};
use crate::state_machine::Reply;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const RESPONSE_PATH: &str = "/get-response";
const SAVE_PATH: &str = "/save-message";

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponderBody {
    #[serde(default)]
    message: Option<String>,
}

/// Build the client shared by both collaborators
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// POST `body` and fail on transport errors or non-2xx statuses
async fn post_message(
    client: &Client,
    url: &str,
    message: &str,
    call: RemoteCall,
) -> Result<reqwest::Response, RemoteCallFailure> {
    let response = client
        .post(url)
        .json(&MessageBody { message })
        .send()
        .await
        .map_err(|e| RemoteCallFailure::from_reqwest(call, &e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteCallFailure::new(call, format!("HTTP {status}: {body}"))
            .with_status(status.as_u16()));
    }
    Ok(response)
}

/// Responder reached over HTTP
pub struct HttpResponder {
    client: Client,
    url: String,
}

impl HttpResponder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            url: endpoint(base_url, RESPONSE_PATH),
        }
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn get_response(&self, message: &str) -> Result<Reply, RemoteCallFailure> {
        let response = post_message(&self.client, &self.url, message, RemoteCall::Responder).await?;
        let body: ResponderBody = response.json().await.map_err(|e| {
            RemoteCallFailure::responder(format!("Invalid response body: {e}"))
        })?;
        Ok(Reply::from_message(body.message))
    }
}

/// Consent recorder reached over HTTP. Any 2xx counts as an ack.
pub struct HttpConsentRecorder {
    client: Client,
    url: String,
}

impl HttpConsentRecorder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            url: endpoint(base_url, SAVE_PATH),
        }
    }
}

#[async_trait]
impl ConsentRecorder for HttpConsentRecorder {
    async fn save_message(&self, message: &str) -> Result<(), RemoteCallFailure> {
        post_message(
            &self.client,
            &self.url,
            message,
            RemoteCall::ConsentRecorder,
        )
        .await?;
        Ok(())
    }
}

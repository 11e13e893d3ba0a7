// src/services/flow_client.rs
//! Client for the remote conversational flow (Langflow "run" endpoint).

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::{ConfigError, FlowSettings};

/// JSON pointer to the reply text inside a flow response.
const REPLY_POINTER: &str = "/outputs/0/outputs/0/results/message/text";

/// Longest slice of an error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("could not reach the flow: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("flow returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("flow response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("flow response has no reply text at outputs[0].outputs[0].results.message.text")]
    MissingReply,
}

#[derive(Debug, Serialize)]
pub struct FlowRequest<'a> {
    pub input_value: &'a str,
    pub output_type: &'static str,
    pub input_type: &'static str,
}

impl<'a> FlowRequest<'a> {
    pub fn chat(message: &'a str) -> Self {
        Self {
            input_value: message,
            output_type: "chat",
            input_type: "chat",
        }
    }
}

#[derive(Clone)]
pub struct FlowClient {
    client: Client,
    run_url: Url,
    token: String,
}

impl std::fmt::Debug for FlowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowClient")
            .field("run_url", &self.run_url.as_str())
            .finish()
    }
}

impl FlowClient {
    pub fn new(settings: &FlowSettings) -> Result<Self, ConfigError> {
        let run_url = run_url(settings)?;
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            run_url,
            token: settings.application_token.clone(),
        })
    }

    pub fn run_url(&self) -> &Url {
        &self.run_url
    }

    /// Send one message to the flow and return its reply text.
    ///
    /// Exactly one request is made. Callers must reject blank input first.
    pub async fn invoke(&self, message: &str) -> Result<String, InvocationError> {
        tracing::debug!(url = %self.run_url, chars = message.chars().count(), "invoking flow");

        let response = self
            .client
            .post(self.run_url.clone())
            .bearer_auth(&self.token)
            .json(&FlowRequest::chat(message))
            .send()
            .await
            .map_err(InvocationError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(InvocationError::Transport)?;

        if !status.is_success() {
            return Err(InvocationError::Status {
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(InvocationError::InvalidJson)?;
        let reply = extract_reply(&value)?;

        tracing::debug!(reply_chars = reply.chars().count(), "flow replied");
        Ok(reply)
    }
}

/// Pull the reply text out of a flow response.
pub fn extract_reply(response: &Value) -> Result<String, InvocationError> {
    response
        .pointer(REPLY_POINTER)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(InvocationError::MissingReply)
}

fn run_url(settings: &FlowSettings) -> Result<Url, ConfigError> {
    let raw = format!(
        "{}/lf/{}/api/v1/run/{}",
        settings.api_base.trim_end_matches('/'),
        settings.flow_id,
        settings.endpoint_id
    );
    Url::parse(&raw).map_err(|e| ConfigError::Invalid {
        key: "ASTRA_DB_API_ENDPOINT",
        reason: format!("{raw}: {e}"),
    })
}

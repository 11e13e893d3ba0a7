// src/services/chat_session.rs
use std::time::Instant;

use thiserror::Error;

use super::flow_client::{FlowClient, InvocationError};
use super::transcript::{Exchange, Transcript};

pub const EMPTY_MESSAGE: &str = "Please enter a message";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

/// One interactive conversation and when it was last used.
///
/// `submit` takes `&mut self`, so a session never has two flow calls in flight.
#[derive(Debug)]
pub struct ChatSession {
    id: String,
    transcript: Transcript,
    last_active: Instant,
}

impl ChatSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transcript: Transcript::new(),
            last_active: Instant::now(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Run one submission through the flow and record it on success.
    pub async fn submit(
        &mut self,
        flow: &FlowClient,
        text: &str,
    ) -> Result<Exchange, SubmitError> {
        self.touch();

        if text.trim().is_empty() {
            tracing::debug!(session_id = %self.id, "rejected blank submission");
            return Err(SubmitError::Validation(EMPTY_MESSAGE));
        }

        let reply = match flow.invoke(text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "flow invocation failed");
                return Err(e.into());
            }
        };

        let exchange = Exchange::new(text, reply);
        self.transcript.append(exchange.clone());
        self.touch();
        tracing::info!(
            session_id = %self.id,
            exchanges = self.transcript.len(),
            "exchange recorded"
        );

        Ok(exchange)
    }
}

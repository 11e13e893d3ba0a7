// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::transcript::Exchange;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ExchangeView {
    pub user_text: String,
    pub bot_text: String,
}

impl From<&Exchange> for ExchangeView {
    fn from(exchange: &Exchange) -> Self {
        Self {
            user_text: exchange.user_text().to_string(),
            bot_text: exchange.bot_text().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub transcript: Vec<ExchangeView>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub transcript: Vec<ExchangeView>,
}

/// Form posted by the chat page.
#[derive(Deserialize, Debug, Default)]
pub struct PageForm {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

// src/state.rs
use std::sync::Arc;
use std::time::Duration;

use crate::services::flow_client::FlowClient;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub flow: FlowClient,
}

impl AppState {
    pub fn new(flow: FlowClient, session_ttl: Duration) -> Self {
        Self {
            sessions: SessionManager::new(session_ttl),
            flow,
        }
    }
}

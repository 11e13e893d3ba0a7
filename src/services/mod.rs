// src/services/mod.rs
pub mod chat_session;
pub mod flow_client;
pub mod session_manager;
pub mod transcript;

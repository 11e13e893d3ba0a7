//! Chat front-end for a remote Langflow flow: a page and a small JSON API,
//! each session keeping its own in-memory transcript.

pub mod config;
pub mod error;
pub mod message;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;

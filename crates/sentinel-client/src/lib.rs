//! HTTP client library for the Sentinel TUI.
//!
//! Implements the core [`Transport`](sentinel_core::Transport) trait against
//! the assistant's REST endpoint.

pub mod http;
pub mod wire;

pub use http::HttpTransport;
pub use wire::{ChatRequest, ChatResponse};

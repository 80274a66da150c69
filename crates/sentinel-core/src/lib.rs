//! Sentinel Core Domain Types
//!
//! This crate contains the conversation domain and the request lifecycle
//! state machine, with no dependencies on:
//! - HTTP/network specifics
//! - Terminal/UI specifics
//!
//! The one outstanding request at a time, its cancellation handle, and the
//! append-only message log all live here.

pub mod chat;
pub mod controller;
pub mod log;
pub mod transport;

// Re-export commonly used types
pub use chat::{ChatEntry, Sender};
pub use controller::{Phase, RequestController, Settle, CANCEL_NOTICE, ERROR_NOTICE};
pub use log::MessageLog;
pub use transport::{Transport, TransportError};

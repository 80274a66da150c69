//! Event types for communication between the backend task and the UI.

use sentinel_core::{ChatEntry, Phase};

/// Events sent from the backend to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// A new entry was appended to the conversation log.
    EntryAppended(ChatEntry),

    /// The request lifecycle phase changed.
    PhaseChanged(Phase),

    /// Result of the startup endpoint health probe.
    ConnectionChecked { healthy: bool },
}

/// Commands sent from the UI to the backend.
#[derive(Debug)]
pub enum Command {
    /// Submit user input as a new request.
    Submit(String),

    /// Cancel the in-flight request.
    Cancel,

    /// Quit the application.
    Quit,
}

//! Chat entry types for the conversation log.

/// Originator of a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// User message (input/prompt).
    User,
    /// Assistant message (response, cancellation notice, or error notice).
    Assistant,
}

/// One message unit in the conversation. Immutable once appended to the log.
#[derive(Debug, Clone)]
pub struct ChatEntry {
    /// Who produced this entry.
    pub sender: Sender,
    /// Entry text. Never empty: user text is trimmed and checked before an
    /// entry is created, and the assistant notices are fixed constants.
    pub text: String,
    /// Unix timestamp (milliseconds) when the entry was created.
    pub timestamp_ms: i64,
}

impl ChatEntry {
    /// Create a new chat entry.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a user entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create an assistant entry.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_entry() {
        let entry = ChatEntry::user("hello");
        assert_eq!(entry.sender, Sender::User);
        assert_eq!(entry.text, "hello");
        assert!(entry.timestamp_ms > 0);
    }

    #[test]
    fn test_assistant_entry() {
        let entry = ChatEntry::assistant("hi there");
        assert_eq!(entry.sender, Sender::Assistant);
        assert_eq!(entry.text, "hi there");
    }
}

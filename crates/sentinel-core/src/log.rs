//! Append-only message log.

use tokio::sync::mpsc;

use crate::chat::ChatEntry;

/// Ordered, append-only sequence of chat entries.
///
/// Insertion order is conversation order and is also display order; entries
/// are never reordered, deduplicated, mutated, or removed. Observers
/// (rendering layers) subscribe with [`MessageLog::subscribe`] and receive a
/// clone of every entry appended after the subscription.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<ChatEntry>,
    watchers: Vec<mpsc::UnboundedSender<ChatEntry>>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the end of the log and notify observers.
    ///
    /// Never fails; observers whose receiver has been dropped are pruned.
    pub fn append(&mut self, entry: ChatEntry) {
        self.watchers.retain(|tx| tx.send(entry.clone()).is_ok());
        self.entries.push(entry);
    }

    /// Subscribe to future appends.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ChatEntry> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.watchers.push(tx);
        rx
    }

    /// Ordered snapshot of all entries.
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Number of entries in the log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

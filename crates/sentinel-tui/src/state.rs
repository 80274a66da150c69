//! UI state for rendering.

use sentinel_core::{ChatEntry, Phase};

/// Snapshot of data for rendering (no async, no locks).
///
/// The conversation entries are a mirror of the backend's message log,
/// populated from `EntryAppended` events; the log itself stays the source of
/// truth.
pub struct UiState {
    /// Conversation entries in display order.
    pub entries: Vec<ChatEntry>,

    /// Current request lifecycle phase. Gates the send affordance: Enter is
    /// inert and editing is disabled while `Pending`.
    pub phase: Phase,

    /// Input buffer. Owned here exclusively until send time.
    pub input: String,

    /// Cursor position in the input buffer, in characters.
    pub cursor: usize,

    /// Chat scroll offset in lines (`usize::MAX` = stick to bottom).
    pub scroll: usize,

    /// Maximum scroll offset observed during the last render, written back
    /// by the render pass so key handling can clamp correctly.
    pub max_scroll: usize,

    /// Result of the startup health probe, `None` until it completes.
    pub connected: Option<bool>,

    /// Animation counter for the pending indicator.
    pub spinner_frame: u8,

    /// Whether the app should exit.
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            phase: Phase::Idle,
            input: String::new(),
            cursor: 0,
            scroll: usize::MAX,
            max_scroll: 0,
            connected: None,
            spinner_frame: 0,
            should_quit: false,
        }
    }
}

impl UiState {
    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    /// Move the cursor one character left.
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one character right.
    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    /// Move the cursor to the start of the input.
    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end of the input.
    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Clear the input buffer, resetting the cursor.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Scroll the chat up by `lines`, leaving stick-to-bottom mode.
    pub fn scroll_up(&mut self, lines: usize) {
        let base = if self.scroll == usize::MAX {
            self.max_scroll
        } else {
            self.scroll
        };
        self.scroll = base.saturating_sub(lines);
    }

    /// Scroll the chat down by `lines`; reaching the bottom re-enables
    /// stick-to-bottom.
    pub fn scroll_down(&mut self, lines: usize) {
        if self.scroll != usize::MAX {
            let next = self.scroll.saturating_add(lines);
            self.scroll = if next >= self.max_scroll {
                usize::MAX
            } else {
                next
            };
        }
    }

    /// Advance the pending animation.
    pub fn tick(&mut self) {
        if self.is_pending() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        } else {
            self.spinner_frame = 0;
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe edits.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut state = UiState::default();
        for c in "héllo".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.input, "héllo");
        assert_eq!(state.cursor, 5);

        state.cursor_home();
        state.cursor_right();
        state.backspace();
        assert_eq!(state.input, "éllo");
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut state = UiState::default();
        for c in "abc".chars() {
            state.insert_char(c);
        }
        state.cursor_home();
        state.delete();
        assert_eq!(state.input, "bc");

        state.cursor_end();
        state.delete(); // past the end, no-op
        assert_eq!(state.input, "bc");
    }

    #[test]
    fn test_clear_input_resets_cursor() {
        let mut state = UiState::default();
        for c in "hello".chars() {
            state.insert_char(c);
        }
        state.clear_input();
        assert!(state.input.is_empty());
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_scroll_round_trip() {
        let mut state = UiState::default();
        state.max_scroll = 10;

        state.scroll_up(3);
        assert_eq!(state.scroll, 7);
        state.scroll_down(2);
        assert_eq!(state.scroll, 9);
        // Reaching the bottom re-enables stick-to-bottom.
        state.scroll_down(5);
        assert_eq!(state.scroll, usize::MAX);
    }
}

//! Application state and main event loop.

use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::event::{Command, UiEvent};
use crate::state::UiState;
use crate::ui;

/// Main application with UI state and channel handles.
pub struct App {
    /// Current UI state snapshot for rendering.
    state: UiState,

    /// Receiver for events from the backend.
    ui_rx: mpsc::Receiver<UiEvent>,

    /// Sender for commands to the backend.
    cmd_tx: mpsc::Sender<Command>,
}

impl App {
    /// Create a new application instance with channel handles.
    pub fn new(ui_rx: mpsc::Receiver<UiEvent>, cmd_tx: mpsc::Sender<Command>) -> Self {
        Self {
            state: UiState::default(),
            ui_rx,
            cmd_tx,
        }
    }

    /// Run the main event loop.
    ///
    /// This runs on the main thread and handles:
    /// - Drawing the UI
    /// - Processing keyboard input
    /// - Receiving updates from the backend
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| ui::render(frame, &mut self.state))?;

            // Poll terminal events (non-blocking with short timeout)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            } else {
                self.state.tick();
            }

            // Process backend events (non-blocking)
            while let Ok(event) = self.ui_rx.try_recv() {
                self.apply_event(event);
            }

            if self.state.should_quit {
                break;
            }
        }

        // Send quit command to backend
        let _ = self.cmd_tx.blocking_send(Command::Quit);

        Ok(())
    }

    /// Apply an event from the backend to the UI state.
    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::EntryAppended(entry) => {
                self.state.entries.push(entry);
                // New entries snap the chat back to the bottom.
                self.state.scroll = usize::MAX;
            }
            UiEvent::PhaseChanged(phase) => {
                self.state.phase = phase;
            }
            UiEvent::ConnectionChecked { healthy } => {
                self.state.connected = Some(healthy);
            }
        }
    }

    /// Handle a key press.
    ///
    /// While a request is pending the send affordance is disabled: Enter and
    /// all editing keys are inert, and Esc routes to cancel instead of quit.
    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.state.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.state.is_pending() {
                    let _ = self.cmd_tx.blocking_send(Command::Cancel);
                } else {
                    self.state.should_quit = true;
                }
            }

            KeyCode::Enter => {
                if !self.state.is_pending() && !self.state.input.trim().is_empty() {
                    let text = self.state.input.clone();
                    let _ = self.cmd_tx.blocking_send(Command::Submit(text));
                    // Cleared at send time, independent of the outcome.
                    self.state.clear_input();
                }
            }

            // Chat scrolling works in any phase.
            KeyCode::Up => self.state.scroll_up(1),
            KeyCode::Down => self.state.scroll_down(1),
            KeyCode::PageUp => self.state.scroll_up(10),
            KeyCode::PageDown => self.state.scroll_down(10),

            // Input editing, disabled while pending.
            _ if self.state.is_pending() => {}
            KeyCode::Backspace => self.state.backspace(),
            KeyCode::Delete => self.state.delete(),
            KeyCode::Left => self.state.cursor_left(),
            KeyCode::Right => self.state.cursor_right(),
            KeyCode::Home => self.state.cursor_home(),
            KeyCode::End => self.state.cursor_end(),
            KeyCode::Char(c) => self.state.insert_char(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Phase;

    fn app() -> (App, mpsc::Receiver<Command>) {
        let (_ui_tx, ui_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        (App::new(ui_rx, cmd_tx), cmd_rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_submits_when_idle() {
        let (mut app, mut cmd_rx) = app();
        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(cmd_rx.try_recv(), Ok(Command::Submit(text)) if text == "hello"));
        // Buffer cleared immediately at send time.
        assert!(app.state.input.is_empty());
    }

    #[test]
    fn test_enter_is_inert_on_whitespace() {
        let (mut app, mut cmd_rx) = app();
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert!(cmd_rx.try_recv().is_err());
        // Rejected input stays in the buffer.
        assert_eq!(app.state.input, "   ");
    }

    #[test]
    fn test_enter_is_inert_while_pending() {
        let (mut app, mut cmd_rx) = app();
        type_text(&mut app, "a");
        app.state.phase = Phase::Pending;

        press(&mut app, KeyCode::Char('b')); // editing disabled too
        press(&mut app, KeyCode::Enter);

        assert!(cmd_rx.try_recv().is_err());
        assert_eq!(app.state.input, "a");
    }

    #[test]
    fn test_esc_cancels_while_pending_quits_when_idle() {
        let (mut app, mut cmd_rx) = app();
        app.state.phase = Phase::Pending;
        press(&mut app, KeyCode::Esc);
        assert!(matches!(cmd_rx.try_recv(), Ok(Command::Cancel)));
        assert!(!app.state.should_quit);

        app.state.phase = Phase::Idle;
        press(&mut app, KeyCode::Esc);
        assert!(app.state.should_quit);
    }

    #[test]
    fn test_entry_appended_snaps_scroll_to_bottom() {
        let (mut app, _cmd_rx) = app();
        app.state.max_scroll = 40;
        app.state.scroll_up(5);
        assert_ne!(app.state.scroll, usize::MAX);

        app.apply_event(UiEvent::EntryAppended(sentinel_core::ChatEntry::assistant("hi")));
        assert_eq!(app.state.scroll, usize::MAX);
    }
}

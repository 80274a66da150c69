//! Main render function for the TUI.

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use sentinel_core::Sender;

use crate::state::UiState;
use crate::utils::{display_width, wrap_text_indented};

/// Render the entire UI.
pub fn render(frame: &mut Frame, state: &mut UiState) {
    let area = frame.area();

    // Create main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_chat(frame, chat_area, state);
    render_input(frame, input_area, state);
    render_footer(frame, footer_area, state);
}

/// Render the header bar.
fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(Span::styled(
        "Sentinel Security Assistant",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
    .centered();

    let header = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Render the conversation area.
fn render_chat(frame: &mut Frame, area: Rect, state: &mut UiState) {
    let visible_height = area.height.saturating_sub(2) as usize;
    let text_width = area.width.saturating_sub(2) as usize;

    // Build all message lines
    let mut all_lines: Vec<Line> = Vec::new();

    for entry in &state.entries {
        let (prefix, style) = match entry.sender {
            Sender::User => (
                "You: ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Sender::Assistant => (
                "AI: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        };

        let timestamp: DateTime<Utc> =
            DateTime::from_timestamp_millis(entry.timestamp_ms).unwrap_or_default();

        // Message header: role prefix plus dim timestamp
        all_lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(
                timestamp.format("%H:%M:%S").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        // Message content with word wrapping
        for wrapped_line in wrap_text_indented(&entry.text, text_width, "  ") {
            all_lines.push(Line::from(Span::raw(wrapped_line)));
        }

        // Blank line between messages
        all_lines.push(Line::from(""));
    }

    // Pending indicator with animated ellipsis
    if state.is_pending() {
        let dots = ".".repeat(1 + (state.spinner_frame as usize / 4) % 3);
        all_lines.push(Line::from(vec![
            Span::styled(
                "AI: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("Assistant is thinking{dots}"),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let total_lines = all_lines.len();

    // Calculate scroll position (usize::MAX = stick to bottom)
    let max_scroll = total_lines.saturating_sub(visible_height);
    state.max_scroll = max_scroll;
    let scroll_offset = if state.scroll == usize::MAX {
        max_scroll
    } else {
        state.scroll.min(max_scroll)
    };

    let lines: Vec<Line> = all_lines
        .into_iter()
        .skip(scroll_offset)
        .take(visible_height)
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Conversation "),
    );

    frame.render_widget(paragraph, area);
}

/// Render the input box, positioning the terminal cursor when editing is
/// enabled.
fn render_input(frame: &mut Frame, area: Rect, state: &UiState) {
    let inner_width = area.width.saturating_sub(2) as usize;

    // Keep the cursor in view when the input is wider than the box.
    let before_cursor: String = state.input.chars().take(state.cursor).collect();
    let cursor_col = display_width(&before_cursor);
    let shift = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let visible: String = state.input.chars().skip(shift).collect();

    let (title, border_style) = if state.is_pending() {
        (
            " Input (waiting, Esc cancels) ",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (" Input ", Style::default().fg(Color::White))
    };

    let input = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(input, area);

    if !state.is_pending() {
        let x = area.x + 1 + (cursor_col - shift) as u16;
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// Render the footer with status and key hints.
fn render_footer(frame: &mut Frame, area: Rect, state: &UiState) {
    let (status, status_style) = match state.connected {
        None => ("Connecting...", Style::default().fg(Color::Yellow)),
        Some(true) => ("Connected", Style::default().fg(Color::Green)),
        Some(false) => ("Endpoint unreachable", Style::default().fg(Color::Red)),
    };

    let help = if state.is_pending() {
        " Esc: cancel | Ctrl+C: quit "
    } else {
        " Enter: send | Up/Down: scroll | Esc: quit "
    };

    let footer = Line::from(vec![
        Span::styled(status, status_style),
        Span::raw(" | "),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}

//! Text utilities for TUI rendering.

use unicode_width::UnicodeWidthChar;

/// Wrap text with an indent prefix for continuation lines.
///
/// Breaks at spaces where possible, handling unicode safely.
pub fn wrap_text_indented(text: &str, width: usize, indent: &str) -> Vec<String> {
    let effective_width = width.saturating_sub(indent.chars().count());

    if effective_width == 0 {
        return vec![format!("{}{}", indent, text)];
    }

    let mut lines = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            lines.push(indent.to_string());
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut start = 0;

        while start < chars.len() {
            let remaining_chars = chars.len() - start;

            if remaining_chars <= effective_width {
                let remaining: String = chars[start..].iter().collect();
                lines.push(format!("{}{}", indent, remaining));
                break;
            }

            // Find a good break point (prefer space within effective_width).
            // rfind yields a byte offset; convert it to a char count before
            // indexing back into the char vector.
            let end = start + effective_width;
            let search_range: String = chars[start..end].iter().collect();
            let break_offset = search_range
                .rfind(' ')
                .map(|b| search_range[..b].chars().count())
                .unwrap_or(effective_width);
            let actual_end = start + break_offset;

            let chunk: String = chars[start..actual_end].iter().collect();
            lines.push(format!("{}{}", indent, chunk.trim_end()));

            // Skip past the space
            start = actual_end;
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
        }
    }

    if lines.is_empty() {
        lines.push(indent.to_string());
    }

    lines
}

/// Display width of a string, counting wide characters as two columns.
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1))
        .sum()
}

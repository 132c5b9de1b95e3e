use ropey::Rope;

use crate::span::Position;

/// Chars of one line, newline included (it scans as whitespace).
pub fn line_chars(text: &Rope, line: usize) -> Vec<char> {
    if line >= text.len_lines() {
        return Vec::new();
    }
    text.line(line).chars().collect()
}

pub fn line_string(text: &Rope, line: usize) -> String {
    if line >= text.len_lines() {
        return String::new();
    }
    text.line(line).to_string()
}

fn char_index(text: &Rope, pos: Position) -> usize {
    let line = (pos.line as usize).min(text.len_lines().saturating_sub(1));
    let line_start = text.line_to_char(line);
    let line_len = text.line(line).len_chars();
    line_start + (pos.character as usize).min(line_len)
}

/// Text between two positions, possibly spanning lines.
pub fn slice_between(text: &Rope, start: Position, end: Position) -> String {
    let s = char_index(text, start);
    let e = char_index(text, end).max(s);
    text.slice(s..e).to_string()
}

use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent};

use hept_core::scan::is_qualified_char;
use hept_core::{Edit, Position as CorePosition, Span};

/// Convert an LSP UTF-16 position to a char offset within its line, clamped
/// to the line length.
pub(crate) fn utf16_to_char_col(text: &Rope, pos: Position) -> usize {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return 0;
    }
    let line = text.line(line_idx);
    let target = pos.character as usize;

    if let Some(s) = line.as_str() {
        if s.is_ascii() {
            return target.min(s.len());
        }
    }

    let mut seen_utf16 = 0usize;
    let mut col = 0usize;
    for ch in line.chars() {
        if seen_utf16 >= target {
            break;
        }
        seen_utf16 += ch.len_utf16();
        col += 1;
    }
    col
}

fn char_col_to_utf16(text: &Rope, line_idx: usize, col: usize) -> u32 {
    if line_idx >= text.len_lines() {
        return col as u32;
    }
    text.line(line_idx)
        .chars()
        .take(col)
        .map(|c| c.len_utf16() as u32)
        .sum()
}

pub(crate) fn to_core_position(text: &Rope, pos: Position) -> CorePosition {
    CorePosition::new(pos.line, utf16_to_char_col(text, pos) as u32)
}

pub(crate) fn to_lsp_position(text: &Rope, pos: CorePosition) -> Position {
    Position::new(pos.line, char_col_to_utf16(text, pos.line as usize, pos.character as usize))
}

pub(crate) fn to_lsp_range(text: &Rope, span: Span) -> Range {
    Range::new(to_lsp_position(text, span.start), to_lsp_position(text, span.end))
}

fn position_to_char_idx(text: &Rope, pos: Position) -> usize {
    let line_idx = (pos.line as usize).min(text.len_lines().saturating_sub(1));
    text.line_to_char(line_idx) + utf16_to_char_col(text, pos)
}

/// Translate one LSP change into the index's edit contract. Must be called
/// against the pre-change rope, since the range addresses the old text.
pub(crate) fn change_to_edit(text: &Rope, change: &TextDocumentContentChangeEvent) -> Option<Edit> {
    let range = change.range?;
    Some(Edit {
        range: Span::new(to_core_position(text, range.start), to_core_position(text, range.end)),
        text: change.text.clone(),
    })
}

/// Apply an incremental LSP change to the rope buffer.
pub(crate) fn apply_incremental_change(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    if let Some(range) = &change.range {
        let start = position_to_char_idx(text, range.start);
        let end = position_to_char_idx(text, range.end);
        let (s, e) = if start <= end { (start, end) } else { (end, start) };
        if s != e {
            text.remove(s..e);
        }
        if !change.text.is_empty() {
            text.insert(s, &change.text);
        }
    } else {
        *text = Rope::from_str(&change.text);
    }
}

/// The qualified word under the cursor (`other.counter` reads as one word).
pub(crate) fn word_at(text: &Rope, pos: Position) -> Option<String> {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return None;
    }
    let chars: Vec<char> = text.line(line_idx).chars().collect();
    let col = utf16_to_char_col(text, pos).min(chars.len());

    let mut start = col;
    while start > 0 && is_qualified_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = col;
    while end < chars.len() && is_qualified_char(chars[end]) {
        end += 1;
    }
    if start == end {
        return None;
    }
    Some(chars[start..end].iter().collect())
}

/// Walk backwards from the cursor to the unmatched `(` that opened the
/// current call, returning its position and the callee name just before it.
/// Qualified callee names are kept whole.
pub(crate) fn find_call_open(text: &Rope, cursor: CorePosition) -> Option<(CorePosition, String)> {
    let mut line_idx = cursor.line as usize;
    if line_idx >= text.len_lines() {
        return None;
    }
    let mut chars: Vec<char> = text.line(line_idx).chars().collect();
    let mut col = (cursor.character as usize).min(chars.len());
    let mut depth = 0i32;

    loop {
        while col > 0 {
            col -= 1;
            match chars[col] {
                ')' => depth += 1,
                '(' => {
                    if depth == 0 {
                        let mut start = col;
                        while start > 0 && is_qualified_char(chars[start - 1]) {
                            start -= 1;
                        }
                        if start == col {
                            return None;
                        }
                        // The paren must sit directly after the callee name.
                        let name: String = chars[start..col].iter().collect();
                        return Some((CorePosition::new(line_idx as u32, col as u32), name));
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        if line_idx == 0 {
            return None;
        }
        line_idx -= 1;
        chars = text.line(line_idx).chars().collect();
        col = chars.len();
    }
}

/// Active parameter index: top-level commas between the call's opening paren
/// and the cursor.
pub(crate) fn active_parameter(text: &Rope, open: CorePosition, cursor: CorePosition) -> u32 {
    let start = text.line_to_char(open.line as usize) + open.character as usize;
    let end = (text.line_to_char(cursor.line as usize) + cursor.character as usize)
        .min(text.len_chars())
        .max(start);

    let mut depth = 0i32;
    let mut commas = 0u32;
    for ch in text.slice(start..end).chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth <= 1 => commas += 1,
            _ => {}
        }
    }
    commas
}

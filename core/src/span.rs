use std::fmt;

use serde::{Deserialize, Serialize};

/// A line/character location in a source document.
///
/// `character` counts Unicode scalar values from the start of the line, not
/// UTF-16 code units; the LSP layer converts at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// Source range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn single_line(line: u32, start_char: u32, end_char: u32) -> Self {
        Self {
            start: Position::new(line, start_char),
            end: Position::new(line, end_char),
        }
    }

    /// Inclusive containment on both ends, lexicographic on (line, character).
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Where this span sits relative to an edited line range.
    pub fn relation_to_lines(&self, first_line: u32, last_line: u32) -> EditRelation {
        if self.end.line < first_line {
            EditRelation::Before
        } else if self.start.line > last_line {
            EditRelation::After
        } else {
            EditRelation::Overlaps
        }
    }

    /// Translate the span by a whole number of lines. Character offsets are
    /// untouched; entities fully outside an edit only ever move vertically.
    pub fn shift_lines(&mut self, delta: i64) {
        self.start.line = (self.start.line as i64 + delta).max(0) as u32;
        self.end.line = (self.end.line as i64 + delta).max(0) as u32;
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Classification of an entity span against an edited region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRelation {
    /// Entirely above the edit; keep as-is.
    Before,
    /// Entirely below the edit; translate by the line delta.
    After,
    /// Touches the edit; discard and reparse the region.
    Overlaps,
}

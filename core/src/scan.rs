use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

// Matches one `(* ... *)` comment on a single line, shortest match first.
// Nested comments and comments spanning lines are not handled; the scan
// layer documents this as a known limitation of the stripping pass.
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\*.*?\*\)").unwrap());

/// Identifier class for plain names: letters, digits and underscore.
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Identifier class for qualified references, which additionally admits the
/// module separator dot (`other.counter`).
pub fn is_qualified_char(c: char) -> bool {
    is_ident_char(c) || c == '.'
}

/// Remove `(* ... *)` comments from a chunk of source text.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(text, "")
}

/// Advance from `start` to the end of the next maximal token.
///
/// The token is either a run of identifier-class characters, a run of
/// whitespace, or a single punctuation/operator character. The returned
/// boundary always satisfies `end > start` and never exceeds the line length;
/// callers slice `[start, end)` to obtain the token text.
pub fn next_word(chars: &[char], start: usize) -> usize {
    next_word_with(chars, start, is_ident_char)
}

/// Like [`next_word`] but treats `.` as part of an identifier, for contexts
/// where qualified `Module.symbol` names are read as one token.
pub fn next_word_qualified(chars: &[char], start: usize) -> usize {
    next_word_with(chars, start, is_qualified_char)
}

fn next_word_with(chars: &[char], start: usize, ident: fn(char) -> bool) -> usize {
    debug_assert!(start < chars.len());
    let first = chars[start];
    let mut end = start + 1;

    if ident(first) {
        while end < chars.len() && ident(chars[end]) {
            end += 1;
        }
    } else if first.is_whitespace() {
        while end < chars.len() && chars[end].is_whitespace() {
            end += 1;
        }
    }
    // Anything else ({ } ( ) : ; = ^ , and friends) is its own token.
    end
}

/// Token iterator over a chunk of text, yielding each maximal word in order.
/// Newlines count as whitespace, so a multi-line span tokenizes seamlessly.
pub struct Words<'a> {
    chars: &'a [char],
    pos: usize,
    qualified: bool,
}

impl<'a> Words<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self {
            chars,
            pos: 0,
            qualified: false,
        }
    }

    pub fn qualified(chars: &'a [char]) -> Self {
        Self {
            chars,
            pos: 0,
            qualified: true,
        }
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a [char];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.chars.len() {
            return None;
        }
        let end = if self.qualified {
            next_word_qualified(self.chars, self.pos)
        } else {
            next_word(self.chars, self.pos)
        };
        let word = &self.chars[self.pos..end];
        self.pos = end;
        Some(word)
    }
}

/// True when the token is a run of identifier characters (not whitespace,
/// not punctuation).
pub fn is_ident_word(word: &[char]) -> bool {
    !word.is_empty() && word.iter().all(|&c| is_ident_char(c))
}

/// Identifier run that may carry qualifying dots (`other.counter`).
pub fn is_qualified_word(word: &[char]) -> bool {
    !word.is_empty() && word.iter().all(|&c| is_qualified_char(c))
}

pub fn is_whitespace_word(word: &[char]) -> bool {
    !word.is_empty() && word.iter().all(|c| c.is_whitespace())
}

pub fn word_to_string(word: &[char]) -> String {
    word.iter().collect()
}

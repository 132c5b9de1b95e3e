use serde::{Deserialize, Serialize};

use crate::scan::{is_ident_word, is_whitespace_word, strip_comments, word_to_string, Words};
use crate::span::Span;

/// A `type Name = <body>` declaration. The body is kept verbatim, braces
/// included; it is never interpreted beyond matching `{`/`}` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAlias {
    pub name: String,
    pub body: String,
    pub span: Span,
}

/// An `open Module` line, stored as the lower-camel-cased module reference
/// other documents are registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRef {
    pub module: String,
    pub line: u32,
}

/// Module-name-to-file-reference convention: `Other` opens `other.ept`.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse the text of a `type` span. The first identifier after the keyword
/// is the name; everything after `=` is captured verbatim into the body.
/// Brace depth only gates recognition of `=`, never suppresses capture.
pub fn parse_type_alias(text: &str, span: Span) -> Option<TypeAlias> {
    let stripped = strip_comments(text);
    let chars: Vec<char> = stripped.chars().collect();

    let mut name = String::new();
    let mut body = String::new();
    let mut seen_keyword = false;
    let mut capturing = false;
    let mut brace_depth = 0u32;

    for word in Words::new(&chars) {
        if capturing {
            body.push_str(&word_to_string(word));
            continue;
        }
        let first = word[0];
        match first {
            '{' => brace_depth += 1,
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '=' if brace_depth == 0 => capturing = true,
            _ if is_whitespace_word(word) => {}
            _ if is_ident_word(word) && brace_depth == 0 => {
                if !seen_keyword {
                    // The `type` keyword itself.
                    seen_keyword = true;
                } else if name.is_empty() {
                    name = word_to_string(word);
                }
            }
            _ => {}
        }
    }

    if name.is_empty() {
        return None;
    }
    Some(TypeAlias {
        name,
        body: body.trim().to_string(),
        span,
    })
}

/// Parse one `open Module` source line into an import reference.
pub fn parse_import(line_text: &str, line: u32) -> Option<ImportRef> {
    let stripped = strip_comments(line_text);
    let chars: Vec<char> = stripped.chars().collect();

    let mut seen_keyword = false;
    for word in Words::new(&chars) {
        if !is_ident_word(word) {
            continue;
        }
        if !seen_keyword {
            // The `open` keyword itself.
            seen_keyword = true;
            continue;
        }
        return Some(ImportRef {
            module: lower_first(&word_to_string(word)),
            line,
        });
    }
    None
}

use serde::{Deserialize, Serialize};

use crate::scan::{is_qualified_word, is_whitespace_word, strip_comments, word_to_string, Words};
use crate::span::Span;

/// One typed variable out of a declaration group.
///
/// `a, b : int^3 = {0, 0, 0};` yields two variables sharing type `int`,
/// dimension list `["3"]` and default `{0, 0, 0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub ty: String,
    /// Array dimension-size expressions, in `^` order.
    pub dims: Vec<String>,
    pub default: Option<String>,
}

impl Variable {
    /// Display type: `int[3][n] = {0}` when dimensions/default are present.
    pub fn type_display(&self) -> String {
        let mut out = self.ty.clone();
        for dim in &self.dims {
            out.push('[');
            out.push_str(dim);
            out.push(']');
        }
        if let Some(default) = &self.default {
            out.push_str(" = ");
            out.push_str(default);
        }
        out
    }

    fn bare_type(&self) -> String {
        let mut out = self.ty.clone();
        for dim in &self.dims {
            out.push('[');
            out.push_str(dim);
            out.push(']');
        }
        out
    }
}

/// An ordered list of variables together with the source span it came from
/// (a parameter list, an output list, or a `var`/`const` block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBlock {
    pub vars: Vec<Variable>,
    pub span: Span,
}

impl VariableBlock {
    pub fn parse(text: &str, span: Span) -> Self {
        Self {
            vars: parse_variables(text),
            span,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.iter().any(|v| v.name == name)
    }

    /// Lookup by name; the model does not enforce uniqueness, last write wins.
    pub fn type_of(&self, name: &str) -> Option<String> {
        self.vars
            .iter()
            .rev()
            .find(|v| v.name == name)
            .map(|v| v.type_display())
    }

    /// `->`-joined type list, used for function type strings.
    pub fn signature(&self) -> String {
        self.vars
            .iter()
            .map(|v| v.bare_type())
            .collect::<Vec<_>>()
            .join("->")
    }

    /// `name : type, ...` form, used for signature-help labels.
    pub fn declaration(&self) -> String {
        self.declaration_items().join(", ")
    }

    pub fn declaration_items(&self) -> Vec<String> {
        self.vars
            .iter()
            .map(|v| format!("{} : {}", v.name, v.bare_type()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Names,
    Type,
    Dims,
    Default,
}

/// Parse a declaration block into a flat variable list.
///
/// Word-by-word scan with a brace-depth counter. At depth zero, `:` starts
/// type capture, `^` captures one array dimension, `=` starts verbatim
/// default capture and `;` flushes the pending name group. Inside `{...}`
/// only brace tracking and default capture stay active.
///
/// A trailing group missing its `;` is flushed when both a name and a type
/// were seen, and dropped otherwise.
pub fn parse_variables(text: &str) -> Vec<Variable> {
    let stripped = strip_comments(text);
    let chars: Vec<char> = stripped.chars().collect();

    let mut vars = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut ty = String::new();
    let mut dims: Vec<String> = Vec::new();
    let mut default = String::new();
    let mut has_default = false;
    let mut capture = Capture::Names;
    let mut brace_depth = 0u32;

    let flush = |names: &mut Vec<String>,
                 ty: &mut String,
                 dims: &mut Vec<String>,
                 default: &mut String,
                 has_default: &mut bool,
                 capture: &mut Capture,
                 vars: &mut Vec<Variable>| {
        if !ty.is_empty() {
            for name in names.drain(..) {
                vars.push(Variable {
                    name,
                    ty: ty.clone(),
                    dims: dims.clone(),
                    default: if *has_default {
                        Some(default.trim().to_string())
                    } else {
                        None
                    },
                });
            }
        }
        names.clear();
        ty.clear();
        dims.clear();
        default.clear();
        *has_default = false;
        *capture = Capture::Names;
    };

    // Qualified scan: type positions may carry `Module.type` references.
    for word in Words::qualified(&chars) {
        let first = word[0];

        if first == '{' {
            brace_depth += 1;
            if capture == Capture::Default {
                default.push('{');
            }
            continue;
        }
        if first == '}' {
            brace_depth = brace_depth.saturating_sub(1);
            if capture == Capture::Default {
                default.push('}');
            }
            continue;
        }
        if brace_depth > 0 {
            // Nested structure is opaque; only default capture records it.
            if capture == Capture::Default {
                default.push_str(&word_to_string(word));
            }
            continue;
        }

        if capture == Capture::Default {
            if first == ';' {
                flush(
                    &mut names,
                    &mut ty,
                    &mut dims,
                    &mut default,
                    &mut has_default,
                    &mut capture,
                    &mut vars,
                );
            } else {
                default.push_str(&word_to_string(word));
            }
            continue;
        }

        if is_whitespace_word(word) {
            continue;
        }

        match first {
            ':' => capture = Capture::Type,
            '^' => capture = Capture::Dims,
            '=' => {
                has_default = true;
                capture = Capture::Default;
            }
            ';' => flush(
                &mut names,
                &mut ty,
                &mut dims,
                &mut default,
                &mut has_default,
                &mut capture,
                &mut vars,
            ),
            ',' | '(' | ')' => {}
            _ if is_qualified_word(word) => {
                let ident = word_to_string(word);
                match capture {
                    Capture::Names => names.push(ident),
                    Capture::Type => {
                        if ty.is_empty() {
                            ty = ident;
                        }
                    }
                    Capture::Dims => {
                        dims.push(ident);
                        capture = Capture::Type;
                    }
                    Capture::Default => unreachable!(),
                }
            }
            _ => {}
        }
    }

    // End of text without a closing `;`.
    if !names.is_empty() && !ty.is_empty() {
        flush(
            &mut names,
            &mut ty,
            &mut dims,
            &mut default,
            &mut has_default,
            &mut capture,
            &mut vars,
        );
    }

    vars
}

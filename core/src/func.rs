use ropey::Rope;
use serde::{Deserialize, Serialize};

use crate::scan::{is_ident_word, next_word, word_to_string};
use crate::span::{Position, Span};
use crate::text::{line_chars, slice_between};
use crate::vars::VariableBlock;

/// A parsed `node`/`fun` declaration with its exact source span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: VariableBlock,
    pub outputs: VariableBlock,
    pub locals: Option<VariableBlock>,
    /// From the entry keyword to just before the `tel` terminator.
    pub span: Span,
}

impl FunctionDef {
    pub fn contains(&self, pos: Position) -> bool {
        self.span.contains(pos)
    }

    /// Signature-help label, e.g. `f(a : int, b : int) -> (int)`.
    pub fn signature_label(&self) -> String {
        format!("{}({}) -> ({})", self.name, self.params.declaration(), self.outputs.signature())
    }

    /// Type of the function itself as a `->`-joined chain over parameter and
    /// output types.
    pub fn signature_type(&self) -> String {
        let params = self.params.signature();
        let outputs = self.outputs.signature();
        if params.is_empty() {
            outputs
        } else {
            format!("{}->{}", params, outputs)
        }
    }

    /// Variable lookup inside this function: locals shadow parameters,
    /// parameters shadow outputs.
    pub fn type_of_variable(&self, name: &str) -> Option<String> {
        if let Some(locals) = &self.locals {
            if let Some(ty) = locals.type_of(name) {
                return Some(ty);
            }
        }
        self.params.type_of(name).or_else(|| self.outputs.type_of(name))
    }
}

const ENTRY_KEYWORDS: [&str; 2] = ["node", "fun"];
const LOCALS_KEYWORDS: [&str; 2] = ["var", "const"];

/// Forward-only scan states; see the field comments in `Scan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for the `node`/`fun` entry keyword.
    SeekEntry,
    /// Entry keyword found; the next identifier is the function name.
    Name,
    /// Collecting the two parenthesized blocks (parameters, then outputs).
    /// The `returns` keyword between them is skipped as an ordinary token.
    Blocks,
    /// Outputs done; `var`/`const` starts a locals block, `let` the body.
    AfterOutputs,
    /// Inside the locals block, which ends at the exact token `let`.
    Locals,
    /// Inside the body, scanning only for the exact token `tel`.
    Body,
}

#[derive(Default)]
struct Scan {
    entry: Option<Position>,
    name: String,
    paren_depth: i32,
    block_start: Option<Position>,
    params: Option<VariableBlock>,
    outputs: Option<VariableBlock>,
    locals_start: Option<Position>,
    locals: Option<VariableBlock>,
}

/// Parse one function starting at a line containing the entry keyword.
///
/// Returns `None` when the document ends before the matching `tel`; an
/// unterminated function is silently absent from the index rather than
/// reported.
pub fn parse_function(text: &Rope, start_line: usize) -> Option<FunctionDef> {
    let total = text.len_lines();
    let mut state = State::SeekEntry;
    let mut scan = Scan::default();

    for line_idx in start_line..total {
        let line = line_chars(text, line_idx);
        let mut i = 0;
        while i < line.len() {
            let j = next_word(&line, i);
            let word = &line[i..j];
            let here = Position::new(line_idx as u32, i as u32);
            let after = Position::new(line_idx as u32, j as u32);

            match state {
                State::SeekEntry => {
                    if is_ident_word(word) && ENTRY_KEYWORDS.iter().any(|k| word_eq(word, k)) {
                        scan.entry = Some(here);
                        state = State::Name;
                    }
                }
                State::Name => {
                    if is_ident_word(word) {
                        scan.name = word_to_string(word);
                        state = State::Blocks;
                    }
                }
                State::Blocks => match word[0] {
                    '(' => {
                        scan.paren_depth += 1;
                        if scan.paren_depth == 1 {
                            scan.block_start = Some(after);
                        }
                    }
                    ')' => {
                        scan.paren_depth -= 1;
                        if scan.paren_depth == 0 {
                            let start = scan.block_start.take()?;
                            let span = Span::new(start, here);
                            let raw = slice_between(text, start, here);
                            let block = VariableBlock::parse(&raw, span);
                            if scan.params.is_none() {
                                scan.params = Some(block);
                            } else {
                                scan.outputs = Some(block);
                                state = State::AfterOutputs;
                            }
                        }
                    }
                    _ => {}
                },
                State::AfterOutputs => {
                    if is_ident_word(word) {
                        if LOCALS_KEYWORDS.iter().any(|k| word_eq(word, k)) {
                            scan.locals_start = Some(after);
                            state = State::Locals;
                        } else if word_eq(word, "let") {
                            state = State::Body;
                        }
                    }
                }
                State::Locals => {
                    // Exact token match only; `lettuce` stays a variable name.
                    if word_eq(word, "let") {
                        let start = scan.locals_start.take()?;
                        let span = Span::new(start, here);
                        let raw = slice_between(text, start, here);
                        scan.locals = Some(VariableBlock::parse(&raw, span));
                        state = State::Body;
                    }
                }
                State::Body => {
                    if word_eq(word, "tel") {
                        return Some(FunctionDef {
                            name: scan.name,
                            params: scan.params?,
                            outputs: scan.outputs?,
                            locals: scan.locals,
                            span: Span::new(scan.entry?, here),
                        });
                    }
                }
            }
            i = j;
        }
    }

    // Ran off the end of the document before `tel`.
    None
}

fn word_eq(word: &[char], keyword: &str) -> bool {
    word.len() == keyword.len() && word.iter().zip(keyword.chars()).all(|(&a, b)| a == b)
}

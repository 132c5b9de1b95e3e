use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use ropey::Rope;
use serde::Serialize;
use tracing::debug;

use crate::decl::{lower_first, parse_import, parse_type_alias, ImportRef, TypeAlias};
use crate::func::{parse_function, FunctionDef};
use crate::registry::DocumentRegistry;
use crate::span::{EditRelation, Position, Span};
use crate::text::{line_string, slice_between};
use crate::vars::VariableBlock;

static ENTRY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(node|fun)\b").unwrap());
static BLOCK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(const|var)\b").unwrap());
static TYPE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*type\b").unwrap());
static OPEN_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*open\b").unwrap());
static TOP_LEVEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(node|fun|const|var|type|open)\b").unwrap());

/// One in-flight text change: the replaced range and the inserted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Span,
    pub text: String,
}

impl Edit {
    /// Net number of lines the edit adds (positive) or removes (negative).
    pub fn line_delta(&self) -> i64 {
        let removed = (self.range.end.line - self.range.start.line) as i64;
        let inserted = self.text.matches('\n').count() as i64;
        inserted - removed
    }
}

/// Call-signature answer for the host surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignatureRepr {
    pub label: String,
    pub parameters: Vec<String>,
}

impl SignatureRepr {
    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }
}

/// The queryable symbol index for one open source file.
///
/// Owns every parsed entity; cross-file references go through the shared
/// [`DocumentRegistry`], which is passed into each resolution call rather
/// than held here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentIndex {
    /// File base name without extension; doubles as the module alias other
    /// documents import this one by.
    pub source_id: String,
    pub functions: Vec<FunctionDef>,
    pub constants: Vec<VariableBlock>,
    pub types: Vec<TypeAlias>,
    pub imports: Vec<ImportRef>,
}

impl DocumentIndex {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Default::default()
        }
    }

    /// Full scan of a freshly opened document.
    pub fn initial_scan(&mut self, text: &Rope) {
        self.functions.clear();
        self.constants.clear();
        self.types.clear();
        self.imports.clear();
        self.scan_lines(text, 0, text.len_lines());
        debug!(
            source = %self.source_id,
            functions = self.functions.len(),
            constants = self.constants.len(),
            types = self.types.len(),
            imports = self.imports.len(),
            "initial scan complete"
        );
    }

    /// Line walk over `[from, to)`, appending every entity found.
    ///
    /// Functions are never nested, so after a successful function parse the
    /// cursor jumps straight to the function's end line instead of re-reading
    /// consumed lines. A failed function parse just moves one line ahead.
    ///
    /// A function whose body runs past `to` is dropped like an unterminated
    /// one: during a bounded rescan the lines from `to` onward belong to
    /// entities kept across the edit, and a body that swallowed them would
    /// overlap their spans. Blocks cannot cross `to` because every kept
    /// entity starts on a top-level keyword line, which ends a block.
    fn scan_lines(&mut self, text: &Rope, from: usize, to: usize) {
        let to = to.min(text.len_lines());
        let mut line = from;
        while line < to {
            let lt = line_string(text, line);
            if ENTRY_LINE.is_match(&lt) {
                if let Some(func) =
                    parse_function(text, line).filter(|f| (f.span.end.line as usize) < to)
                {
                    line = func.span.end.line as usize + 1;
                    self.functions.push(func);
                    continue;
                }
            } else if let Some(m) = BLOCK_LINE.find(&lt) {
                let start = Position::new(line as u32, m.end() as u32);
                let end = find_block_end(text, line);
                let span = Span::new(start, end);
                let raw = slice_between(text, start, end);
                self.constants.push(VariableBlock::parse(&raw, span));
                line = end.line as usize + 1;
                continue;
            } else if TYPE_LINE.is_match(&lt) {
                let start = Position::new(line as u32, 0);
                let end = find_block_end(text, line);
                let span = Span::new(start, end);
                let raw = slice_between(text, start, end);
                if let Some(alias) = parse_type_alias(&raw, span) {
                    self.types.push(alias);
                }
                line = end.line as usize + 1;
                continue;
            } else if OPEN_LINE.is_match(&lt) {
                if let Some(import) = parse_import(&lt, line as u32) {
                    self.imports.push(import);
                }
            }
            line += 1;
        }
    }

    /// Incremental re-parse after one text change.
    ///
    /// `text` is the post-edit snapshot. Entities entirely past the edited
    /// lines are translated by the edit's net line delta; entities entirely
    /// above it are untouched; anything overlapping is discarded and the
    /// region between its neighbors is rescanned from the new text. Cost is
    /// bounded by the edited region plus one adjacent entity on each side.
    pub fn apply_edit(&mut self, edit: &Edit, text: &Rope) {
        let delta = edit.line_delta();
        let first = edit.range.start.line;
        let last = edit.range.end.line;

        // Re-scan boundaries: just past the last untouched entity above,
        // up to the first (shifted) untouched entity below.
        let mut lower: Option<u32> = None;
        let mut upper: Option<u32> = None;

        let mut classify = |span: &mut Span| match span.relation_to_lines(first, last) {
            EditRelation::Before => {
                lower = Some(lower.map_or(span.end.line, |l| l.max(span.end.line)));
                true
            }
            EditRelation::After => {
                span.shift_lines(delta);
                upper = Some(upper.map_or(span.start.line, |u| u.min(span.start.line)));
                true
            }
            EditRelation::Overlaps => false,
        };

        self.functions.retain_mut(|f| classify(&mut f.span));
        self.constants.retain_mut(|c| classify(&mut c.span));
        self.types.retain_mut(|t| classify(&mut t.span));
        self.imports.retain_mut(|imp| {
            if imp.line < first {
                lower = Some(lower.map_or(imp.line, |l| l.max(imp.line)));
                true
            } else if imp.line > last {
                imp.line = (imp.line as i64 + delta).max(0) as u32;
                upper = Some(upper.map_or(imp.line, |u| u.min(imp.line)));
                true
            } else {
                false
            }
        });

        let from = lower.map_or(0, |l| l as usize + 1);
        let to = upper.map_or(text.len_lines(), |u| u as usize);
        debug!(source = %self.source_id, delta, from, to, "rescanning edited region");
        self.scan_lines(text, from, to);
    }

    /// Call-signature lookup: own functions first, then a qualified-name
    /// split, then each import in declaration order.
    pub fn resolve_signature(
        &self,
        name: &str,
        registry: &DocumentRegistry,
        visited: &mut HashSet<String>,
    ) -> SignatureRepr {
        if let Some(func) = self.functions.iter().find(|f| f.name == name) {
            return SignatureRepr {
                label: func.signature_label(),
                parameters: func.params.declaration_items(),
            };
        }
        if let Some((alias, symbol)) = name.split_once('.') {
            return registry.resolve_signature(&lower_first(alias), symbol, visited);
        }
        for import in &self.imports {
            let repr = registry.resolve_signature(&import.module, name, visited);
            if !repr.is_empty() {
                return repr;
            }
        }
        SignatureRepr::default()
    }

    /// Type of the token under the cursor. Priority order, first hit wins:
    /// function name, variable of the enclosing function, document constant,
    /// type alias, then imports in order. A qualified result gets exactly one
    /// extra resolution pass, never a fixed-point chase.
    pub fn resolve_type_at(
        &self,
        token: &str,
        pos: Position,
        registry: &DocumentRegistry,
        visited: &mut HashSet<String>,
    ) -> String {
        let resolved = self.resolve_type_plain(token, Some(pos), registry, visited);
        self.qualified_second_pass(resolved, registry)
    }

    /// Document-level type lookup used by cross-file delegation; no cursor,
    /// so enclosing-function variables never participate and no second
    /// qualified pass is taken.
    pub fn resolve_type(
        &self,
        token: &str,
        registry: &DocumentRegistry,
        visited: &mut HashSet<String>,
    ) -> String {
        self.resolve_type_plain(token, None, registry, visited)
    }

    fn resolve_type_plain(
        &self,
        token: &str,
        pos: Option<Position>,
        registry: &DocumentRegistry,
        visited: &mut HashSet<String>,
    ) -> String {
        if let Some(func) = self.functions.iter().find(|f| f.name == token) {
            return func.signature_type();
        }
        if let Some((alias, symbol)) = token.split_once('.') {
            return registry.resolve_type(&lower_first(alias), symbol, visited);
        }
        if let Some(pos) = pos {
            if let Some(func) = self.functions.iter().find(|f| f.contains(pos)) {
                if let Some(ty) = func.type_of_variable(token) {
                    return ty;
                }
            }
        }
        for constants in &self.constants {
            if let Some(ty) = constants.type_of(token) {
                return ty;
            }
        }
        if let Some(alias) = self.types.iter().find(|t| t.name == token) {
            return alias.body.clone();
        }
        for import in &self.imports {
            let ty = registry.resolve_type(&import.module, token, visited);
            if !ty.is_empty() {
                return ty;
            }
        }
        String::new()
    }

    fn qualified_second_pass(&self, resolved: String, registry: &DocumentRegistry) -> String {
        if let Some((alias, symbol)) = resolved.split_once('.') {
            if !alias.is_empty() && alias.chars().all(crate::scan::is_ident_char) {
                let mut visited = HashSet::from([self.source_id.clone()]);
                let second = registry.resolve_type(&lower_first(alias), symbol, &mut visited);
                if !second.is_empty() {
                    return second;
                }
            }
        }
        resolved
    }
}

/// End of the top-level block starting at `start_line`: the last line before
/// the next top-level keyword line outside any `{...}` nesting, or the end of
/// the document.
fn find_block_end(text: &Rope, start_line: usize) -> Position {
    let total = text.len_lines();
    let mut depth = 0i64;
    let mut end_line = start_line;
    for line_idx in start_line..total {
        let lt = line_string(text, line_idx);
        if line_idx > start_line && depth == 0 && TOP_LEVEL_LINE.is_match(&lt) {
            break;
        }
        for c in lt.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
        }
        end_line = line_idx;
    }
    let len = text.line(end_line).len_chars() as u32;
    Position::new(end_line as u32, len)
}

#[cfg(test)]
mod tests {
    use ropey::Rope;
    use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent};

    use crate::server::text::{
        active_parameter, apply_incremental_change, change_to_edit, find_call_open, to_core_position,
        word_at,
    };
    use hept_core::Position as CorePosition;

    fn change(range: Range, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(range),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn word_at_reads_qualified_names() {
        let text = Rope::from_str("  y = other.counter(x);\n");
        assert_eq!(word_at(&text, Position::new(0, 8)).as_deref(), Some("other.counter"));
        assert_eq!(word_at(&text, Position::new(0, 20)).as_deref(), Some("x"));
        assert_eq!(word_at(&text, Position::new(0, 1)), None);
    }

    #[test]
    fn call_open_scan_skips_balanced_parens() {
        let text = Rope::from_str("y = f(g(1, 2), \n");
        let cursor = to_core_position(&text, Position::new(0, 15));
        let (open, name) = find_call_open(&text, cursor).expect("call should be found");
        assert_eq!(name, "f");
        assert_eq!(open, CorePosition::new(0, 5));
    }

    #[test]
    fn call_open_scan_crosses_lines() {
        let text = Rope::from_str("y = f(a,\n      b,\n");
        let cursor = to_core_position(&text, Position::new(1, 7));
        let (_, name) = find_call_open(&text, cursor).expect("call should be found");
        assert_eq!(name, "f");
    }

    #[test]
    fn no_open_call_means_no_signature() {
        let text = Rope::from_str("y = f(a)\n");
        let cursor = to_core_position(&text, Position::new(0, 8));
        assert!(find_call_open(&text, cursor).is_none());
    }

    #[test]
    fn active_parameter_counts_top_level_commas_only() {
        let text = Rope::from_str("y = f(g(1, 2), b, \n");
        let open = CorePosition::new(0, 5);
        assert_eq!(active_parameter(&text, open, CorePosition::new(0, 7)), 0);
        assert_eq!(active_parameter(&text, open, CorePosition::new(0, 15)), 1);
        assert_eq!(active_parameter(&text, open, CorePosition::new(0, 18)), 2);
    }

    #[test]
    fn change_converts_then_applies() {
        let mut text = Rope::from_str("node f () returns ()\nlet tel\n");
        let ch = change(Range::new(Position::new(1, 4), Position::new(1, 4)), "x = 1; ");

        let edit = change_to_edit(&text, &ch).expect("ranged change");
        assert_eq!(edit.range.start, CorePosition::new(1, 4));
        assert_eq!(edit.text, "x = 1; ");
        assert_eq!(edit.line_delta(), 0);

        apply_incremental_change(&mut text, &ch);
        assert_eq!(text.to_string(), "node f () returns ()\nlet x = 1; tel\n");
    }

    #[test]
    fn multi_line_deletion_delta() {
        let text = Rope::from_str("a\nb\nc\nd\n");
        let ch = change(Range::new(Position::new(1, 0), Position::new(3, 0)), "");
        let edit = change_to_edit(&text, &ch).unwrap();
        assert_eq!(edit.line_delta(), -2);
    }

    #[test]
    fn full_replacement_has_no_edit() {
        let text = Rope::from_str("old\n");
        let ch = TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new\n".to_string(),
        };
        assert!(change_to_edit(&text, &ch).is_none());
        let mut text = text;
        apply_incremental_change(&mut text, &ch);
        assert_eq!(text.to_string(), "new\n");
    }
}

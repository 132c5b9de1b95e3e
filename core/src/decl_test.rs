#[cfg(test)]
mod tests {
    use crate::decl::{lower_first, parse_import, parse_type_alias};
    use crate::span::Span;

    fn span() -> Span {
        Span::single_line(0, 0, 0)
    }

    #[test]
    fn simple_alias() {
        let alias = parse_type_alias("type speed = int", span()).unwrap();
        assert_eq!(alias.name, "speed");
        assert_eq!(alias.body, "int");
    }

    #[test]
    fn brace_body_is_kept_verbatim() {
        let alias = parse_type_alias("type color = { red; green; blue }", span()).unwrap();
        assert_eq!(alias.name, "color");
        assert_eq!(alias.body, "{ red; green; blue }");
    }

    #[test]
    fn equals_inside_braces_does_not_start_capture() {
        let alias = parse_type_alias("type t { x = 1 } = int", span()).unwrap();
        assert_eq!(alias.name, "t");
        assert_eq!(alias.body, "int");
    }

    #[test]
    fn alias_without_name_is_dropped() {
        assert!(parse_type_alias("type = int", span()).is_none());
        assert!(parse_type_alias("type", span()).is_none());
    }

    #[test]
    fn comments_are_stripped_before_alias_parse() {
        let alias = parse_type_alias("type (* doc *) speed = int", span()).unwrap();
        assert_eq!(alias.name, "speed");
    }

    #[test]
    fn import_module_name_is_lower_camel_cased() {
        let import = parse_import("open Mathext", 4).unwrap();
        assert_eq!(import.module, "mathext");
        assert_eq!(import.line, 4);
    }

    #[test]
    fn import_without_module_is_dropped() {
        assert!(parse_import("open", 0).is_none());
        assert!(parse_import("open (* nothing *)", 0).is_none());
    }

    #[test]
    fn lower_first_only_touches_the_head() {
        assert_eq!(lower_first("Other"), "other");
        assert_eq!(lower_first("alreadyLower"), "alreadyLower");
        assert_eq!(lower_first(""), "");
    }
}

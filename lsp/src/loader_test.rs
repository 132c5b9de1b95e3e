#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use hept_core::{DocumentIndex, DocumentRegistry};
    use ropey::Rope;

    use crate::server::loader::load_into_registry;

    #[tokio::test]
    async fn missing_module_is_found_parsed_and_registered() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("lib");
        fs::create_dir(&sub).unwrap();
        fs::write(
            sub.join("other.ept"),
            "node g (x : int) returns (y : int) let y = x; tel\n",
        )
        .unwrap();

        let registry = DocumentRegistry::new();
        assert!(load_into_registry(dir.path(), "other", &registry).await);
        assert!(registry.contains("other"));

        let other = registry.get_cloned("other").unwrap();
        let mut visited = HashSet::new();
        let repr = other.resolve_signature("g", &registry, &mut visited);
        assert_eq!(repr.label, "g(x : int) -> (int)");
    }

    #[tokio::test]
    async fn epi_interface_files_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("iface.epi"),
            "fun h (a : bool) returns (b : bool) let b = a; tel\n",
        )
        .unwrap();

        let registry = DocumentRegistry::new();
        assert!(load_into_registry(dir.path(), "iface", &registry).await);
        assert!(registry.contains("iface"));
    }

    #[tokio::test]
    async fn unknown_module_is_a_quiet_miss() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DocumentRegistry::new();
        assert!(!load_into_registry(dir.path(), "ghost", &registry).await);
        assert!(!registry.contains("ghost"));
    }

    #[tokio::test]
    async fn existing_entry_is_not_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DocumentRegistry::new();
        let mut index = DocumentIndex::new("other");
        index.initial_scan(&Rope::from_str("type t = int\n"));
        registry.insert("other", index);

        // No file on disk, but the registry already answers for the alias.
        assert!(load_into_registry(dir.path(), "other", &registry).await);
    }
}

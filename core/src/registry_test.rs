#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use ropey::Rope;

    use crate::index::DocumentIndex;
    use crate::registry::{DocumentRegistry, ModuleLoader};

    #[derive(Default)]
    struct RecordingLoader {
        requests: Mutex<Vec<String>>,
    }

    impl ModuleLoader for RecordingLoader {
        fn request_load(&self, alias: &str) {
            self.requests.lock().unwrap().push(alias.to_string());
        }
    }

    fn indexed(source_id: &str, src: &str) -> DocumentIndex {
        let mut index = DocumentIndex::new(source_id);
        index.initial_scan(&Rope::from_str(src));
        index
    }

    #[test]
    fn insert_remove_lifecycle() {
        let registry = DocumentRegistry::new();
        registry.insert("main", DocumentIndex::new("main"));
        assert!(registry.contains("main"));
        registry.remove("main");
        assert!(!registry.contains("main"));
    }

    #[test]
    fn miss_triggers_background_load_and_returns_empty() {
        let registry = DocumentRegistry::new();
        let loader = Arc::new(RecordingLoader::default());
        registry.set_loader(loader.clone());

        let main = indexed("main", "open Other\n");
        let mut visited = HashSet::from(["main".to_string()]);
        let repr = main.resolve_signature("Other.g", &registry, &mut visited);
        assert!(repr.is_empty());
        assert_eq!(*loader.requests.lock().unwrap(), vec!["other"]);

        // Load "completes": the next query sees the inserted index.
        registry.insert(
            "other",
            indexed("other", "node g (x : int) returns (y : int) let y = x; tel\n"),
        );
        let mut visited = HashSet::from(["main".to_string()]);
        let repr = main.resolve_signature("Other.g", &registry, &mut visited);
        assert_eq!(repr.label, "g(x : int) -> (int)");
    }

    #[test]
    fn repeated_misses_retrigger_the_search() {
        let registry = DocumentRegistry::new();
        let loader = Arc::new(RecordingLoader::default());
        registry.set_loader(loader.clone());

        let main = indexed("main", "open Other\n");
        for _ in 0..3 {
            let mut visited = HashSet::from(["main".to_string()]);
            assert!(main.resolve_signature("Other.g", &registry, &mut visited).is_empty());
        }
        assert_eq!(loader.requests.lock().unwrap().len(), 3);
    }

    #[test]
    fn import_cycle_terminates_with_empty_answer() {
        let registry = DocumentRegistry::new();
        registry.insert("a", indexed("a", "open B\n"));
        registry.insert("b", indexed("b", "open A\n"));

        let a = registry.get_cloned("a").unwrap();
        let mut visited = HashSet::from(["a".to_string()]);
        assert!(a.resolve_signature("missing", &registry, &mut visited).is_empty());

        let mut visited = HashSet::from(["a".to_string()]);
        assert_eq!(a.resolve_type("missing", &registry, &mut visited), "");
    }

    #[test]
    fn self_import_is_guarded() {
        let registry = DocumentRegistry::new();
        registry.insert("a", indexed("a", "open A\n"));
        let a = registry.get_cloned("a").unwrap();
        let mut visited = HashSet::from(["a".to_string()]);
        assert!(a.resolve_signature("missing", &registry, &mut visited).is_empty());
    }

    #[test]
    fn loader_is_optional() {
        let registry = DocumentRegistry::new();
        let main = indexed("main", "open Other\n");
        let mut visited = HashSet::from(["main".to_string()]);
        // No loader attached: a miss is still just an empty answer.
        assert!(main.resolve_signature("Other.g", &registry, &mut visited).is_empty());
    }
}

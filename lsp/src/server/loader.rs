use std::path::{Path, PathBuf};
use std::sync::Arc;

use ropey::Rope;
use tracing::{debug, warn};

use hept_core::{DocumentIndex, DocumentRegistry, ModuleLoader};

/// Background module loader: when a qualified reference misses the registry,
/// search the workspace for `alias.ept` / `alias.epi`, parse it and insert
/// the index. The triggering query has already returned empty by the time
/// this runs; only later queries observe the result.
pub(crate) struct WorkspaceLoader {
    root: PathBuf,
    registry: Arc<DocumentRegistry>,
}

impl WorkspaceLoader {
    pub(crate) fn new(root: PathBuf, registry: Arc<DocumentRegistry>) -> Self {
        Self { root, registry }
    }
}

impl ModuleLoader for WorkspaceLoader {
    fn request_load(&self, alias: &str) {
        let root = self.root.clone();
        let registry = Arc::clone(&self.registry);
        let alias = alias.to_string();
        tokio::spawn(async move {
            load_into_registry(&root, &alias, &registry).await;
        });
    }
}

/// One load attempt; returns whether an index was inserted.
pub(crate) async fn load_into_registry(
    root: &Path,
    alias: &str,
    registry: &DocumentRegistry,
) -> bool {
    if registry.contains(alias) {
        return true;
    }
    let Some(path) = find_module_file(root, alias).await else {
        debug!(%alias, "no matching source file in workspace");
        return false;
    };
    match tokio::fs::read_to_string(&path).await {
        Ok(source) => {
            let mut index = DocumentIndex::new(alias);
            index.initial_scan(&Rope::from_str(&source));
            registry.insert(alias, index);
            debug!(%alias, path = %path.display(), "loaded module from workspace");
            true
        }
        Err(err) => {
            warn!(%alias, path = %path.display(), %err, "failed to read module source");
            false
        }
    }
}

/// Directory walk (depth-first, unordered) matching `alias.ept` / `alias.epi`.
async fn find_module_file(root: &Path, alias: &str) -> Option<PathBuf> {
    let targets = [format!("{alias}.ept"), format!("{alias}.epi")];
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            continue;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if targets.iter().any(|t| t == name) {
                    return Some(path);
                }
            }
        }
    }
    None
}

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::index::{DocumentIndex, SignatureRepr};

/// Fire-and-forget hook for loading a not-yet-indexed module.
///
/// Implementations search the workspace for `alias.ept` / `alias.epi`, parse
/// the file and insert the resulting index into the registry. The query that
/// triggered the load never waits for it; resolution on first miss is
/// best-effort and eventually consistent.
pub trait ModuleLoader: Send + Sync {
    fn request_load(&self, alias: &str);
}

/// Shared module-alias → [`DocumentIndex`] store.
///
/// Owned by the host surface and passed by reference into every resolution
/// call. Mutated by insert-on-open and remove-on-close only; cross-document
/// queries clone the target index out so no map lock is held while the
/// resolution chain recurses.
#[derive(Default)]
pub struct DocumentRegistry {
    docs: DashMap<String, DocumentIndex>,
    loader: OnceCell<Arc<dyn ModuleLoader>>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the background loader; may only be set once.
    pub fn set_loader(&self, loader: Arc<dyn ModuleLoader>) {
        let _ = self.loader.set(loader);
    }

    pub fn insert(&self, alias: impl Into<String>, index: DocumentIndex) {
        let alias = alias.into();
        debug!(%alias, "registering document index");
        self.docs.insert(alias, index);
    }

    pub fn remove(&self, alias: &str) {
        debug!(%alias, "discarding document index");
        self.docs.remove(alias);
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.docs.contains_key(alias)
    }

    pub fn get_cloned(&self, alias: &str) -> Option<DocumentIndex> {
        self.docs.get(alias).map(|entry| entry.clone())
    }

    /// Mutate the live index for `alias` in place, if present. The closure
    /// must not resolve through the registry; edits never recurse.
    pub fn with_index_mut<R>(&self, alias: &str, f: impl FnOnce(&mut DocumentIndex) -> R) -> Option<R> {
        self.docs.get_mut(alias).map(|mut entry| f(entry.value_mut()))
    }

    /// Cycle-guarded qualified signature lookup. A missing module triggers a
    /// background load and the current query returns empty immediately.
    pub fn resolve_signature(
        &self,
        alias: &str,
        symbol: &str,
        visited: &mut HashSet<String>,
    ) -> SignatureRepr {
        if !visited.insert(alias.to_string()) {
            return SignatureRepr::default();
        }
        match self.get_cloned(alias) {
            Some(doc) => doc.resolve_signature(symbol, self, visited),
            None => {
                self.request_load(alias);
                SignatureRepr::default()
            }
        }
    }

    /// Cycle-guarded qualified type lookup; same miss behavior as
    /// [`Self::resolve_signature`].
    pub fn resolve_type(&self, alias: &str, token: &str, visited: &mut HashSet<String>) -> String {
        if !visited.insert(alias.to_string()) {
            return String::new();
        }
        match self.get_cloned(alias) {
            Some(doc) => doc.resolve_type(token, self, visited),
            None => {
                self.request_load(alias);
                String::new()
            }
        }
    }

    fn request_load(&self, alias: &str) {
        debug!(%alias, "module not indexed yet, requesting load");
        if let Some(loader) = self.loader.get() {
            loader.request_load(alias);
        }
    }
}

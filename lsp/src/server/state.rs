use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use ropey::Rope;
use tower_lsp::lsp_types::Url;
use tower_lsp::Client;

use hept_core::DocumentRegistry;

use super::config::ServerConfig;

/// In-memory text of one open Heptagon document. The parsed index itself
/// lives in the shared registry, keyed by the module alias.
#[derive(Debug)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
    pub(crate) alias: String,
}

/// Primary LSP server state shared across handlers.
pub(crate) struct HeptLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) registry: Arc<DocumentRegistry>,
    pub(crate) config: Mutex<ServerConfig>,
    pub(crate) workspace_root: Mutex<Option<PathBuf>>,
}

impl HeptLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            registry: Arc::new(DocumentRegistry::new()),
            config: Mutex::new(ServerConfig::default()),
            workspace_root: Mutex::new(None),
        }
    }
}

/// Module alias for a file: base name without the `.ept`/`.epi` extension,
/// as other documents reference it in `open` lines.
pub(crate) fn alias_for(uri: &Url) -> String {
    let path = uri.path();
    let base = path.rsplit('/').next().unwrap_or(path);
    base.trim_end_matches(".ept").trim_end_matches(".epi").to_string()
}

use serde::Deserialize;
use tower_lsp::lsp_types::ConfigurationItem;

use super::state::HeptLanguageServer;

/// Compiler invocation settings, mirroring the `heptagon.*` editor settings.
#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) compiler_path: String,
    pub(crate) verbose_compiling: bool,
    pub(crate) output_dir: Option<String>,
    pub(crate) target_language: String,
    pub(crate) supplementary_options: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            compiler_path: "heptc".to_string(),
            verbose_compiling: false,
            output_dir: None,
            target_language: "c".to_string(),
            supplementary_options: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct HeptConfigSection {
    #[serde(default)]
    compiler_heptc: Option<String>,
    #[serde(default)]
    verbose_compiling: Option<bool>,
    #[serde(default)]
    output_dir: Option<String>,
    #[serde(default)]
    target_language: Option<String>,
    #[serde(default)]
    supplementary_options: Option<String>,
}

impl HeptLanguageServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some("heptagon".to_string()),
        }];

        if let Ok(values) = self.client.configuration(items).await {
            if let Some(val) = values.into_iter().next() {
                if let Ok(cfg) = serde_json::from_value::<HeptConfigSection>(val) {
                    let mut guard = self.config.lock().unwrap();
                    if let Some(v) = cfg.compiler_heptc.filter(|v| !v.is_empty()) {
                        guard.compiler_path = v;
                    }
                    if let Some(v) = cfg.verbose_compiling {
                        guard.verbose_compiling = v;
                    }
                    guard.output_dir = cfg.output_dir.filter(|v| !v.is_empty());
                    if let Some(v) = cfg.target_language.filter(|v| !v.is_empty()) {
                        guard.target_language = v;
                    }
                    guard.supplementary_options = cfg.supplementary_options.filter(|v| !v.is_empty());
                }
            }
        }
    }
}

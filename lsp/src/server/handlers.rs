use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use ropey::Rope;
use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::info;

use hept_core::DocumentIndex;

use super::loader::WorkspaceLoader;
use super::signature::to_signature_information;
use super::state::{alias_for, Document, HeptLanguageServer};
use super::text::{
    active_parameter, apply_incremental_change, change_to_edit, find_call_open, to_core_position,
    to_lsp_range, word_at,
};

pub(crate) const COMMAND_COMPILE: &str = "heptagon.compile";
pub(crate) const COMMAND_RUN: &str = "heptagon.run";
pub(crate) const COMMAND_DEBUG: &str = "heptagon.debug";

#[tower_lsp::async_trait]
impl LanguageServer for HeptLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        #[allow(deprecated)]
        let root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| folder.uri.clone())
            .or(params.root_uri)
            .and_then(|uri| uri.to_file_path().ok());

        if let Some(root) = root {
            info!(root = %root.display(), "workspace root resolved");
            *self.workspace_root.lock().unwrap() = Some(root.clone());
            self.registry
                .set_loader(Arc::new(WorkspaceLoader::new(root, Arc::clone(&self.registry))));
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(vec!["(".to_string(), ",".to_string()]),
                    retrigger_characters: None,
                    work_done_progress_options: Default::default(),
                }),
                code_lens_provider: Some(CodeLensOptions {
                    resolve_provider: Some(false),
                }),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![
                        COMMAND_COMPILE.to_string(),
                        COMMAND_RUN.to_string(),
                        COMMAND_DEBUG.to_string(),
                    ],
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Heptagon Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Heptagon Language Server initialized");
        let _ = self
            .client
            .log_message(MessageType::INFO, "Heptagon Language Server started")
            .await;
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Heptagon Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, _params: DidChangeConfigurationParams) {
        self.load_config().await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let alias = alias_for(&uri);
        let content = Rope::from_str(&params.text_document.text);

        let mut index = DocumentIndex::new(alias.clone());
        index.initial_scan(&content);
        self.registry.insert(alias.clone(), index);

        self.documents.insert(
            uri,
            Document {
                content,
                version: params.text_document.version,
                alias,
            },
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(mut doc) = self.documents.get_mut(&uri) else {
            return;
        };
        doc.version = params.text_document.version;

        for change in &params.content_changes {
            match change_to_edit(&doc.content, change) {
                Some(edit) => {
                    apply_incremental_change(&mut doc.content, change);
                    let snapshot = doc.content.clone();
                    let applied = self
                        .registry
                        .with_index_mut(&doc.alias, |index| index.apply_edit(&edit, &snapshot));
                    if applied.is_none() {
                        // Change arrived before open somehow; fall back to a
                        // full scan.
                        let mut index = DocumentIndex::new(doc.alias.clone());
                        index.initial_scan(&snapshot);
                        self.registry.insert(doc.alias.clone(), index);
                    }
                }
                None => {
                    // Full-text replacement: the incremental contract does
                    // not apply, rescan from scratch.
                    doc.content = Rope::from_str(&change.text);
                    let snapshot = doc.content.clone();
                    let mut index = DocumentIndex::new(doc.alias.clone());
                    index.initial_scan(&snapshot);
                    self.registry.insert(doc.alias.clone(), index);
                }
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some((_, doc)) = self.documents.remove(&uri) {
            self.registry.remove(&doc.alias);
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let (word, pos, alias) = {
            let Some(doc) = self.documents.get(uri) else {
                return Ok(None);
            };
            let Some(word) = word_at(&doc.content, position) else {
                return Ok(None);
            };
            (word, to_core_position(&doc.content, position), doc.alias.clone())
        };

        let Some(index) = self.registry.get_cloned(&alias) else {
            return Ok(None);
        };
        let mut visited = HashSet::from([alias]);
        let ty = index.resolve_type_at(&word, pos, &self.registry, &mut visited);
        if ty.is_empty() {
            return Ok(None);
        }
        Ok(Some(Hover {
            contents: HoverContents::Scalar(MarkedString::String(format!("{} : {}", word, ty))),
            range: None,
        }))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let (name, active, alias) = {
            let Some(doc) = self.documents.get(uri) else {
                return Ok(None);
            };
            let cursor = to_core_position(&doc.content, position);
            let Some((open_pos, name)) = find_call_open(&doc.content, cursor) else {
                return Ok(None);
            };
            let active = active_parameter(&doc.content, open_pos, cursor);
            (name, active, doc.alias.clone())
        };

        let Some(index) = self.registry.get_cloned(&alias) else {
            return Ok(None);
        };
        let mut visited = HashSet::from([alias]);
        let repr = index.resolve_signature(&name, &self.registry, &mut visited);
        if repr.is_empty() {
            return Ok(None);
        }

        Ok(Some(SignatureHelp {
            signatures: vec![to_signature_information(repr, active)],
            active_signature: Some(0),
            active_parameter: Some(active),
        }))
    }

    async fn code_lens(&self, params: CodeLensParams) -> Result<Option<Vec<CodeLens>>> {
        let uri = params.text_document.uri;
        let Some(doc) = self.documents.get(&uri) else {
            return Ok(None);
        };
        let Some(index) = self.registry.get_cloned(&doc.alias) else {
            return Ok(None);
        };

        let source_arg = Value::String(uri.to_file_path().map_or_else(
            |_| uri.to_string(),
            |p| p.display().to_string(),
        ));
        let mut lenses = Vec::with_capacity(index.functions.len() * 2);
        for func in &index.functions {
            let range = to_lsp_range(&doc.content, func.span);
            for (title, command) in [("run", COMMAND_RUN), ("debug", COMMAND_DEBUG)] {
                lenses.push(CodeLens {
                    range,
                    command: Some(Command {
                        title: title.to_string(),
                        command: command.to_string(),
                        arguments: Some(vec![source_arg.clone(), Value::String(func.name.clone())]),
                    }),
                    data: None,
                });
            }
        }
        Ok(Some(lenses))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        let mut args = params.arguments.into_iter();
        let source = args
            .next()
            .and_then(|v| v.as_str().map(PathBuf::from));
        let node = args.next().and_then(|v| v.as_str().map(String::from));

        match params.command.as_str() {
            COMMAND_COMPILE => {
                self.compile_and_log(source, None).await;
            }
            COMMAND_RUN | COMMAND_DEBUG => {
                // Compiling with the entry node is the whole chain here; a
                // failed compile (non-empty stderr) stops before any run.
                self.compile_and_log(source, node.as_deref()).await;
            }
            other => {
                info!(command = other, "ignoring unknown command");
            }
        }
        Ok(None)
    }
}

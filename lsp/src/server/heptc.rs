use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

use tower_lsp::lsp_types::MessageType;

use super::config::ServerConfig;
use super::state::HeptLanguageServer;

/// Captured output of one compiler invocation.
#[derive(Debug)]
pub(crate) struct CompileOutput {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl CompileOutput {
    /// A non-empty error stream is the failure signal, matching heptc's
    /// habit of exiting zero on some diagnostics.
    pub(crate) fn succeeded(&self) -> bool {
        self.stderr.is_empty()
    }
}

/// Directory heptc drops generated sources into: `<stem>_c` / `<stem>_java`
/// next to the chosen target path.
pub(crate) fn artifact_dir(target_path: &Path, source: &Path, target_language: &str) -> PathBuf {
    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    target_path.join(format!("{}_{}", stem, target_language))
}

/// Assemble the full heptc argv: compiler path, optional verbosity, optional
/// target path, target language, optional entry node, extra options, then
/// the source file.
pub(crate) fn build_command(
    config: &ServerConfig,
    source: &Path,
    target_path: Option<&Path>,
    entry_node: Option<&str>,
) -> Vec<String> {
    let mut argv = vec![config.compiler_path.clone()];

    if config.verbose_compiling {
        argv.push("-v".to_string());
    }
    if let Some(dir) = target_path {
        argv.push("-targetpath".to_string());
        argv.push(dir.display().to_string());
    }
    argv.push("-target".to_string());
    argv.push(config.target_language.clone());
    if let Some(node) = entry_node {
        argv.push("-s".to_string());
        argv.push(node.to_string());
    }
    if let Some(options) = &config.supplementary_options {
        argv.extend(options.split_whitespace().map(str::to_string));
    }
    argv.push(source.display().to_string());
    argv
}

impl HeptLanguageServer {
    /// Compile a source file, surfacing compiler output in the client log.
    /// Returns false when the error stream was non-empty, which halts any
    /// downstream run/debug step.
    pub(crate) async fn compile_and_log(
        &self,
        source: Option<PathBuf>,
        entry_node: Option<&str>,
    ) -> bool {
        let Some(source) = source else {
            let _ = self
                .client
                .log_message(MessageType::ERROR, "no heptagon source file to compile")
                .await;
            return false;
        };

        let (config, root) = {
            let config = self.config.lock().unwrap().clone();
            let root = self.workspace_root.lock().unwrap().clone();
            (config, root)
        };
        let target_path = match (&config.output_dir, &root) {
            (Some(dir), Some(root)) => Some(root.join(dir)),
            _ => None,
        };
        let argv = build_command(&config, &source, target_path.as_deref(), entry_node);

        match run_command(&argv, root.as_deref()).await {
            Ok(output) => {
                if !output.stdout.is_empty() {
                    let _ = self.client.log_message(MessageType::INFO, &output.stdout).await;
                }
                if output.succeeded() {
                    let dir = artifact_dir(
                        target_path.as_deref().unwrap_or(source.parent().unwrap_or(Path::new("."))),
                        &source,
                        &config.target_language,
                    );
                    let _ = self
                        .client
                        .log_message(
                            MessageType::INFO,
                            format!("compiled {} into {}", source.display(), dir.display()),
                        )
                        .await;
                    true
                } else {
                    let _ = self
                        .client
                        .log_message(MessageType::ERROR, "error during the compiling")
                        .await;
                    let _ = self.client.log_message(MessageType::ERROR, &output.stderr).await;
                    false
                }
            }
            Err(err) => {
                let _ = self
                    .client
                    .log_message(MessageType::ERROR, format!("heptc invocation failed: {err:#}"))
                    .await;
                false
            }
        }
    }
}

/// Run the compiler and capture both streams verbatim.
pub(crate) async fn run_command(argv: &[String], cwd: Option<&Path>) -> Result<CompileOutput> {
    let (program, args) = argv.split_first().context("empty compiler command")?;
    info!(command = %argv.join(" "), "invoking heptc");

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let output = cmd
        .output()
        .await
        .with_context(|| format!("failed to spawn '{}'", program))?;

    Ok(CompileOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

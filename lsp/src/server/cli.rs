use std::path::{Component, Path};

use anyhow::Context;
use ropey::Rope;

use hept_core::DocumentIndex;

/// `hept-lsp --analyze <file>` prints the parsed symbol index as JSON and
/// exits, bypassing the server loop.
pub(crate) fn try_cli_analyze() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() <= 1 {
        return Ok(None);
    }

    if let Some(i) = args.iter().position(|a| a == "--analyze") {
        let path = args
            .get(i + 1)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Usage: hept-lsp --analyze <relative-file-path>"))?;

        let content = read_file_content(&path)?;
        let stem = Path::new(&path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let mut index = DocumentIndex::new(stem);
        index.initial_scan(&Rope::from_str(&content));
        return Ok(Some(serde_json::to_string_pretty(&index)?));
    }

    Ok(None)
}

/// Relative paths only, no parent-dir escapes, no control characters, no
/// Windows drive prefixes.
pub(crate) fn is_safe_path(path: &str) -> bool {
    let p = Path::new(path);
    !path.is_empty()
        && !p.is_absolute()
        && p.components().all(|c| c != Component::ParentDir)
        && !path.contains(['\0', '\n', '\r', '\t'])
        && path.as_bytes().get(1) != Some(&b':')
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        return Err(anyhow::anyhow!("Unsafe file path: {}", path));
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path))
}

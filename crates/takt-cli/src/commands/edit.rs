//! Edit command: open the log in the user's editor.

use std::process::Command;

use anyhow::{Context, Result};

use crate::Config;

const FALLBACK_EDITOR: &str = "vim";

pub fn run(config: &Config) -> Result<()> {
    let editor = resolve_editor(config.editor.as_deref(), std::env::var("EDITOR").ok().as_deref());
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(FALLBACK_EDITOR);

    tracing::debug!(%editor, file = %config.file.display(), "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(&config.file)
        .status()
        .with_context(|| format!("failed to start editor {program}"))?;
    if !status.success() {
        anyhow::bail!("editor {program} exited with status {status}");
    }
    Ok(())
}

/// Picks the configured editor, then `$EDITOR`, then `vim`. Blank values are skipped.
fn resolve_editor(configured: Option<&str>, env: Option<&str>) -> String {
    [configured, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|editor| !editor.is_empty())
        .unwrap_or(FALLBACK_EDITOR)
        .to_string()
}

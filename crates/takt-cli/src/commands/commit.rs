//! Commit command: record the log in its enclosing git repository.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, message: Option<&str>) -> Result<()> {
    let file = config
        .file
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", config.file.display()))?;
    let start = file.parent().unwrap_or(Path::new("."));
    let root = find_git_root(start)
        .with_context(|| format!("{} is not in a git repository", file.display()))?;
    let relative = file.strip_prefix(&root).unwrap_or(&file);
    let message = message.unwrap_or(&config.commit_message);

    let status = git(&root)
        .arg("add")
        .arg(relative)
        .status()
        .context("failed to run git add")?;
    if !status.success() {
        anyhow::bail!("git add {} exited with status {status}", relative.display());
    }

    let status = git(&root)
        .args(["commit", "-m", message])
        .status()
        .context("failed to run git commit")?;
    match status.code() {
        Some(0) => writeln!(writer, "Committed {}", relative.display())?,
        // git exits 1 when the index has nothing new.
        Some(1) => writeln!(writer, "Nothing to commit.")?,
        _ => anyhow::bail!("git commit exited with status {status}"),
    }
    Ok(())
}

fn git(root: &Path) -> Command {
    tracing::debug!(root = %root.display(), "running git");
    let mut command = Command::new("git");
    command.arg("-C").arg(root);
    command
}

/// Returns the nearest directory at or above `start` containing `.git`.
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

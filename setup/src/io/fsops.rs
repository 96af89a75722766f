//! Filesystem convergence helpers shared by every phase.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Remove a path whether it is a file or a directory tree. Missing paths
/// are a no-op, so repeated fix runs converge.
pub fn remove_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path).with_context(|| format!("remove directory {}", path.display()))?;
        debug!(path = %path.display(), "removed directory");
    } else if path.exists() {
        fs::remove_file(path).with_context(|| format!("remove file {}", path.display()))?;
        debug!(path = %path.display(), "removed file");
    }
    Ok(())
}

/// Remove everything inside `dir` except entries named in `keep`.
///
/// Missing directories are a no-op.
pub fn clear_dir_contents(dir: &Path, keep: &[&str]) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    let entries = fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let name = entry.file_name();
        if keep.iter().any(|kept| name.as_os_str() == *kept) {
            continue;
        }
        remove_path(&entry.path())?;
    }
    Ok(())
}

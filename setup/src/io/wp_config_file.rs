//! Configuration file reads, writes, and the single-generation backup.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::layout::CONFIG_FILE;

/// Read the configuration file, `None` when absent.
pub fn read_config(root: &Path) -> Result<Option<String>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    Ok(Some(contents))
}

/// Create the `.bak` copy of the configuration file if none exists yet.
///
/// The backup is single-generation: once created it is never overwritten,
/// so it always holds the state before the very first mutation, not the
/// latest pre-mutation state. Returns whether a backup was created.
pub fn backup_once(root: &Path) -> Result<bool> {
    let path = root.join(CONFIG_FILE);
    let backup = root.join(format!("{CONFIG_FILE}.bak"));
    if backup.exists() {
        return Ok(false);
    }
    fs::copy(&path, &backup)
        .with_context(|| format!("copy {} to {}", path.display(), backup.display()))?;
    debug!(backup = %backup.display(), "created configuration backup");
    Ok(true)
}

/// Overwrite the configuration file. Callers gate this on Fix mode.
pub fn write_config(root: &Path, contents: &str) -> Result<()> {
    let path = root.join(CONFIG_FILE);
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_config_is_none() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert_eq!(read_config(temp.path()).expect("read"), None);
    }

    #[test]
    fn backup_is_created_once_and_never_overwritten() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(CONFIG_FILE), "original").expect("write");

        assert!(backup_once(temp.path()).expect("first backup"));
        write_config(temp.path(), "mutated").expect("write");

        // A later run must not replace the original backup.
        assert!(!backup_once(temp.path()).expect("second backup"));
        let backup = fs::read_to_string(temp.path().join("wp-config.php.bak")).expect("read bak");
        assert_eq!(backup, "original");
    }
}

//! Manifest persistence and the external package-manager collaborator.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::core::layout::{MANIFEST_FILE, MANIFEST_SAMPLE_FILE};
use crate::core::manifest::Manifest;
use crate::core::types::Mode;
use crate::io::process::run_with_timeout;
use crate::report;

pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(15 * 60);
pub const INSTALL_OUTPUT_LIMIT_BYTES: usize = 200_000;

/// Load the manifest, or seed it from the sample template.
///
/// Check mode: a missing or malformed manifest is a process-terminating
/// condition. Fix mode: a missing manifest is seeded from
/// `composer.sample.json` (hard failure if the sample is also absent);
/// malformed JSON still fails hard, since silently rewriting a manifest the
/// user edited would lose data.
pub fn load_or_create(root: &Path, mode: Mode) -> Result<Manifest> {
    let manifest_path = root.join(MANIFEST_FILE);

    if !manifest_path.exists() {
        if !mode.is_fix() {
            return Err(anyhow!("{MANIFEST_FILE} not found"));
        }
        let sample_path = root.join(MANIFEST_SAMPLE_FILE);
        if !sample_path.exists() {
            return Err(anyhow!(
                "{MANIFEST_SAMPLE_FILE} not found, cannot create {MANIFEST_FILE}"
            ));
        }
        report::warning(&format!("{MANIFEST_FILE} not found, creating from sample"));
        let raw = fs::read_to_string(&sample_path)
            .with_context(|| format!("read {}", sample_path.display()))?;
        let manifest =
            serde_json::from_str(&raw).with_context(|| format!("parse {MANIFEST_SAMPLE_FILE}"))?;
        return Ok(manifest);
    }

    let raw = fs::read_to_string(&manifest_path)
        .with_context(|| format!("read {}", manifest_path.display()))?;
    let manifest =
        serde_json::from_str(&raw).with_context(|| format!("invalid {MANIFEST_FILE} format"))?;
    report::success(&format!("{MANIFEST_FILE} loaded successfully"));
    Ok(manifest)
}

/// Atomically write the manifest with pretty formatting (temp + rename).
pub fn write_manifest(root: &Path, manifest: &Manifest) -> Result<()> {
    let path = root.join(MANIFEST_FILE);
    let mut buf = serde_json::to_string_pretty(manifest).context("serialize manifest")?;
    buf.push('\n');
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, buf).with_context(|| format!("write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path).with_context(|| format!("replace {}", path.display()))?;
    debug!(path = %path.display(), "manifest written");
    Ok(())
}

/// Outcome of a package-manager invocation.
#[derive(Debug)]
pub struct InstallOutcome {
    pub success: bool,
    /// Captured stdout + stderr, surfaced on failure.
    pub output: String,
}

/// The external package manager, treated as an opaque command with an exit
/// code.
pub trait PackageManager {
    fn install(&self, root: &Path) -> Result<InstallOutcome>;
}

/// Real `composer install` invocation.
pub struct ComposerCli;

impl ComposerCli {
    /// Locate a usable composer executable, trying the common fallbacks.
    fn locate(root: &Path) -> Option<PathBuf> {
        let phar = root.join("composer.phar");
        if phar.exists() {
            return Some(phar);
        }
        for candidate in ["composer", "/usr/local/bin/composer"] {
            let mut probe = Command::new("which");
            probe.arg(candidate);
            if let Ok(output) = run_with_timeout(probe, Duration::from_secs(10), 4_096)
                && output.success()
            {
                return Some(PathBuf::from(candidate));
            }
        }
        None
    }
}

impl PackageManager for ComposerCli {
    fn install(&self, root: &Path) -> Result<InstallOutcome> {
        let composer = Self::locate(root)
            .ok_or_else(|| anyhow!("composer not found in PATH; install it and re-run"))?;

        info!(composer = %composer.display(), "running composer install");
        let mut cmd = Command::new(&composer);
        cmd.args(["install", "--no-dev", "--optimize-autoloader"])
            .current_dir(root);
        let output = run_with_timeout(cmd, INSTALL_TIMEOUT, INSTALL_OUTPUT_LIMIT_BYTES)
            .context("run composer install")?;

        Ok(InstallOutcome {
            success: output.success(),
            output: output.combined(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn check_mode_fails_on_missing_manifest() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_or_create(temp.path(), Mode::Check).expect_err("should fail");
        assert!(err.to_string().contains("composer.json not found"));
    }

    #[test]
    fn fix_mode_seeds_from_sample() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(MANIFEST_SAMPLE_FILE),
            r#"{ "name": "<website-slug>/root", "require": { "johnpbloch/wordpress": "*" } }"#,
        )
        .expect("write sample");

        let manifest = load_or_create(temp.path(), Mode::Fix).expect("load");
        assert!(manifest.has_core_dependency());
    }

    #[test]
    fn fix_mode_fails_when_sample_also_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_or_create(temp.path(), Mode::Fix).expect_err("should fail");
        assert!(err.to_string().contains("composer.sample.json not found"));
    }

    #[test]
    fn malformed_manifest_fails_hard() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(MANIFEST_FILE), "{ not json").expect("write");
        let err = load_or_create(temp.path(), Mode::Check).expect_err("should fail");
        assert!(err.to_string().contains("invalid composer.json format"));
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut manifest = Manifest::default();
        manifest.set_project_name("acme");
        manifest.ensure_core_dependency();

        write_manifest(temp.path(), &manifest).expect("write");
        let loaded = load_or_create(temp.path(), Mode::Check).expect("load");
        assert_eq!(loaded.name.as_deref(), Some("acme/root"));
        assert_eq!(loaded.require.get("johnpbloch/wordpress"), Some(&json!("*")));
    }
}

//! Phase 1: converge the dependency manifest and the root file layout.
//!
//! Order matters: the manifest is finalized and installed first, then the
//! layout checks run against what the install materialized. The finalized
//! manifest is returned for Phase 3, which resolves the expected theme from
//! its dependency list.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::layout::{
    CORE_PACKAGE, CORE_PLUGINS_DIR, CORE_SETTINGS_FILE, CORE_THEMES_DIR, FRONT_CONTROLLER,
    FRONT_CONTROLLER_BODY, FRONT_CONTROLLER_BOOTSTRAP, LEGACY_ROOT_FILES,
};
use crate::core::manifest::Manifest;
use crate::core::types::Mode;
use crate::io::input::ENV_REGISTRY_TOKEN;
use crate::io::{composer_file, fsops};
use crate::phases::{Collaborators, unmet_error};
use crate::report;

pub fn run(root: &Path, mode: Mode, collab: &Collaborators<'_>) -> Result<Manifest> {
    let mut manifest = composer_file::load_or_create(root, mode)?;
    let mut unmet = Vec::new();

    if mode.is_fix() {
        let project = collab.input.project_input(&manifest.defaults())?;
        manifest.set_project_name(&project.website_slug);
        manifest.set_project_dependency(&project.website_repo_slug, &project.branch_name);
        if manifest.ensure_core_dependency() {
            report::success(&format!("Added {CORE_PACKAGE} dependency"));
        }
        report::success(&format!(
            "Project set to {}/{} (branch {})",
            project.website_slug, project.website_repo_slug, project.branch_name
        ));
    } else {
        if manifest.has_core_dependency() {
            report::success(&format!("{CORE_PACKAGE} dependency present"));
        } else {
            unmet.push(format!("{CORE_PACKAGE} dependency is missing"));
        }
        if manifest.has_placeholders() {
            unmet.push("manifest still contains sample placeholders".to_string());
        }
    }

    if manifest.has_registry_token() {
        report::success("Private registry token configured");
    } else if mode.is_fix() {
        // Without the token the install below cannot reach the private
        // registry, so a missing token halts the run.
        match collab.input.registry_token()? {
            Some(token) => {
                manifest.set_registry_token(&token);
                report::success("Private registry token stored");
            }
            None => {
                return Err(anyhow!(
                    "private registry token is required; set {ENV_REGISTRY_TOKEN} or enter it at the prompt"
                ));
            }
        }
    } else {
        unmet.push("private registry token is missing or a placeholder".to_string());
    }

    if mode.is_fix() {
        composer_file::write_manifest(root, &manifest)?;
        report::success("Manifest written");

        let outcome = collab.package_manager.install(root)?;
        if !outcome.success {
            return Err(anyhow!("package install failed:\n{}", outcome.output));
        }
        report::success("Dependencies installed");
    }

    if root.join(CORE_SETTINGS_FILE).exists() {
        report::success(&format!("Core installed ({CORE_SETTINGS_FILE} present)"));
    } else if mode.is_fix() {
        // The install reported success yet core is absent; nothing further
        // can converge.
        return Err(anyhow!(
            "{CORE_SETTINGS_FILE} missing after install; core package did not materialize"
        ));
    } else {
        unmet.push(format!("{CORE_SETTINGS_FILE} missing (core not installed)"));
    }

    // Core ships bundled themes/plugins; the project supplies its own, so
    // the bundled directories must hold nothing but a .gitkeep.
    for dir in [CORE_THEMES_DIR, CORE_PLUGINS_DIR] {
        let path = root.join(dir);
        if mode.is_fix() {
            fsops::clear_dir_contents(&path, &[".gitkeep"])?;
            debug!(dir, "cleared bundled content");
        } else if has_stray_entries(&path)? {
            unmet.push(format!("{dir} contains bundled content"));
        }
    }

    let mut legacy_found = false;
    for name in LEGACY_ROOT_FILES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        legacy_found = true;
        if mode.is_fix() {
            fsops::remove_path(&path)?;
            report::success(&format!("Removed legacy root entry {name}"));
        } else {
            unmet.push(format!("legacy root entry {name} present"));
        }
    }
    if !legacy_found {
        report::success("No legacy root files");
    }

    let index = root.join(FRONT_CONTROLLER);
    let index_ok = fs::read_to_string(&index)
        .map(|body| body.contains(FRONT_CONTROLLER_BOOTSTRAP))
        .unwrap_or(false);
    if index_ok {
        report::success(&format!("{FRONT_CONTROLLER} loads the relocated core"));
    } else if mode.is_fix() {
        fs::write(&index, FRONT_CONTROLLER_BODY)
            .with_context(|| format!("write {}", index.display()))?;
        report::success(&format!("Rewrote {FRONT_CONTROLLER}"));
    } else {
        unmet.push(format!(
            "{FRONT_CONTROLLER} missing or not loading {FRONT_CONTROLLER_BOOTSTRAP}"
        ));
    }

    unmet_error("manifest phase", unmet)?;
    Ok(manifest)
}

fn has_stray_entries(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    let entries = fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        if entry.file_name() != ".gitkeep" {
            return Ok(true);
        }
    }
    Ok(false)
}

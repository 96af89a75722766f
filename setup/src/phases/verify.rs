//! Phase 3: verify the converged environment actually works.
//!
//! Everything here exercises live systems: the database must accept the
//! configured credentials, the runtime must boot, and the expected project
//! theme must end up active. Conditions that cannot be fixed automatically
//! (a theme the install never delivered, an unreachable database) fail the
//! run in both modes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::constants;
use crate::core::layout::{
    BASE_THEME, CONFIG_FILE, CORE_LOAD_FILE, LOG_DIR, LOG_FILE, PLACEHOLDER, VENDOR_MU_PLUGIN,
    VENDOR_NAMESPACE,
};
use crate::core::manifest::Manifest;
use crate::core::themes::{ProjectTheme, expected_project_theme};
use crate::core::types::Mode;
use crate::io::{fsops, wp_config_file};
use crate::phases::{Collaborators, unmet_error};
use crate::report;

pub fn run(
    root: &Path,
    home: &Path,
    mode: Mode,
    manifest: &Manifest,
    collab: &Collaborators<'_>,
) -> Result<()> {
    let mut unmet = Vec::new();

    let content = wp_config_file::read_config(root)?
        .ok_or_else(|| anyhow!("{CONFIG_FILE} not found, cannot verify the environment"))?;
    let store = constants::parse_constants(&content);

    let credentials = constants::db_credentials(&store)
        .ok_or_else(|| anyhow!("database constants missing from {CONFIG_FILE}"))?;
    if credentials.password == PLACEHOLDER {
        return Err(anyhow!(
            "database password is still the '{PLACEHOLDER}' placeholder; set real credentials in {CONFIG_FILE}"
        ));
    }
    collab
        .database
        .connect(root, &credentials)
        .context("database connectivity check")?;
    report::success("Database connection OK");

    let mu_plugin = root.join(VENDOR_MU_PLUGIN);
    if mu_plugin.exists() {
        if mode.is_fix() {
            fsops::remove_path(&mu_plugin)?;
            report::success(&format!("Removed {VENDOR_MU_PLUGIN}"));
        } else {
            unmet.push(format!(
                "{VENDOR_MU_PLUGIN} present (breaks subdirectory installs)"
            ));
        }
    }

    let log_file = home.join(LOG_DIR).join(LOG_FILE);
    if log_file.exists() {
        report::success(&format!("Logging file ~/{LOG_DIR}/{LOG_FILE} present"));
    } else if mode.is_fix() {
        fs::create_dir_all(home.join(LOG_DIR))
            .with_context(|| format!("create {}", home.join(LOG_DIR).display()))?;
        fs::write(&log_file, "").with_context(|| format!("create {}", log_file.display()))?;
        report::success(&format!("Created logging file ~/{LOG_DIR}/{LOG_FILE}"));
    } else {
        unmet.push(format!("logging file ~/{LOG_DIR}/{LOG_FILE} missing"));
    }

    if !root.join(CORE_LOAD_FILE).exists() {
        return Err(anyhow!("{CORE_LOAD_FILE} missing, cannot bootstrap"));
    }
    collab
        .wordpress
        .bootstrap(root)
        .context("bootstrap check")?;
    report::success("Environment bootstraps");

    let candidates = manifest.theme_candidates();
    collab.wordpress.clear_theme_cache(root)?;
    let installed = collab.wordpress.installed_themes(root)?;
    debug!(count = installed.len(), "installed themes queried");

    let expected = expected_project_theme(&candidates, &installed).ok_or_else(|| {
        anyhow!("no project theme dependency under '{VENDOR_NAMESPACE}' in the manifest")
    })?;
    if let ProjectTheme::Fallback(slug) = &expected {
        report::warning(&format!(
            "Ambiguous theme candidates; assuming '{slug}' is the project theme"
        ));
    }

    let is_installed = |slug: &str| installed.iter().any(|theme| theme.slug == slug);
    if is_installed(BASE_THEME) {
        report::success(&format!("Base theme '{BASE_THEME}' installed"));
    } else {
        unmet.push(format!("base theme '{BASE_THEME}' not installed"));
    }

    if !is_installed(expected.slug()) {
        unmet.push(format!(
            "project theme '{}' not installed",
            expected.slug()
        ));
    } else {
        let active = collab.wordpress.active_theme(root)?;
        if active == expected.slug() {
            report::success(&format!("Project theme '{active}' is active"));
        } else if mode.is_fix() {
            collab.wordpress.activate_theme(root, expected.slug())?;
            let active = collab.wordpress.active_theme(root)?;
            if active == expected.slug() {
                report::success(&format!("Activated project theme '{active}'"));
            } else {
                return Err(anyhow!(
                    "activation did not stick: active theme is '{active}', expected '{}'",
                    expected.slug()
                ));
            }
        } else {
            unmet.push(format!(
                "active theme is '{active}', expected '{}'",
                expected.slug()
            ));
        }
    }

    unmet_error("verification phase", unmet)
}

//! The three-phase convergence pipeline.
//!
//! Phases run in a fixed order and fail fast: each later phase assumes the
//! earlier ones left the project in their converged state. External systems
//! (package manager, application runtime, database, user input) are reached
//! only through the trait objects in [`Collaborators`], so the pipeline is
//! testable end to end with in-process fakes.

use std::path::Path;

use anyhow::Result;

use crate::core::manifest::Manifest;
use crate::core::types::Mode;
use crate::io::composer_file::PackageManager;
use crate::io::db::DatabaseProbe;
use crate::io::input::InputSource;
use crate::io::wp_cli::WordPressRuntime;
use crate::report;

pub mod composer;
pub mod config;
pub mod verify;

/// Every external system the pipeline touches.
pub struct Collaborators<'a> {
    pub package_manager: &'a dyn PackageManager,
    pub wordpress: &'a dyn WordPressRuntime,
    pub database: &'a dyn DatabaseProbe,
    pub input: &'a dyn InputSource,
}

/// Run all three phases against the project at `root`.
///
/// `home` is the home directory used for the logging-location check; it is
/// injected rather than read from the environment so tests can redirect it.
pub fn run_pipeline(
    root: &Path,
    home: &Path,
    mode: Mode,
    collab: &Collaborators<'_>,
) -> Result<Manifest> {
    report::banner("Phase 1: dependency manifest");
    let manifest = composer::run(root, mode, collab)?;

    report::banner("Phase 2: configuration constants");
    config::run(root, mode, collab)?;

    report::banner("Phase 3: environment verification");
    verify::run(root, home, mode, &manifest, collab)?;

    Ok(manifest)
}

/// Render a list of unmet conditions as one phase failure.
fn unmet_error(phase: &str, unmet: Vec<String>) -> Result<()> {
    if unmet.is_empty() {
        return Ok(());
    }
    for issue in &unmet {
        report::error(issue);
    }
    Err(anyhow::anyhow!(
        "{phase}: {} unmet condition(s):\n - {}",
        unmet.len(),
        unmet.join("\n - ")
    ))
}

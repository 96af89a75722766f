//! Phase 2: converge the configuration constant store.
//!
//! Check mode validates the file against the definitions derived from its
//! own `WP_HOME`, so it checks internal consistency without prompting. Fix
//! mode gathers the site URL, patches the file, and re-validates the result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::core::constants;
use crate::core::layout::{CONFIG_FILE, CONFIG_SAMPLE_FILE};
use crate::core::types::Mode;
use crate::io::wp_config_file;
use crate::phases::{Collaborators, unmet_error};
use crate::report;

pub fn run(root: &Path, mode: Mode, collab: &Collaborators<'_>) -> Result<()> {
    let content = match wp_config_file::read_config(root)? {
        Some(content) => {
            report::success(&format!("{CONFIG_FILE} found"));
            content
        }
        None if mode.is_fix() => {
            let sample = root.join(CONFIG_SAMPLE_FILE);
            if !sample.exists() {
                return Err(anyhow!(
                    "{CONFIG_SAMPLE_FILE} not found, cannot create {CONFIG_FILE}"
                ));
            }
            report::warning(&format!("{CONFIG_FILE} not found, creating from sample"));
            fs::copy(&sample, root.join(CONFIG_FILE))
                .with_context(|| format!("copy {CONFIG_SAMPLE_FILE} to {CONFIG_FILE}"))?;
            fs::read_to_string(root.join(CONFIG_FILE))
                .with_context(|| format!("read {CONFIG_FILE}"))?
        }
        None => return Err(anyhow!("{CONFIG_FILE} not found")),
    };

    let store = constants::parse_constants(&content);
    let current = constants::current_home(&store);

    let domain = if mode.is_fix() {
        Some(collab.input.site_input(current)?.website_domain)
    } else {
        current
    };
    let required = constants::required_definitions(domain.as_deref());

    let final_content = if mode.is_fix() {
        let patch = constants::patch_constants(&content, &required);
        if patch.changed {
            if wp_config_file::backup_once(root)? {
                report::info(&format!("Backup created: {CONFIG_FILE}.bak"));
            }
            wp_config_file::write_config(root, &patch.content)?;
            for name in &patch.corrected {
                report::success(&format!("Corrected {name}"));
            }
            for name in &patch.added {
                report::success(&format!("Added {name}"));
            }
        } else {
            report::success(&format!("{CONFIG_FILE} already up to date"));
        }
        patch.content
    } else {
        content
    };

    let errors = constants::validate_constants(&final_content, &required);
    if errors.is_empty() {
        report::success("All required constants are correct");
    }
    unmet_error("configuration phase", errors)
}

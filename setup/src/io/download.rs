//! Template download preceding the pipeline.
//!
//! The two sample templates are fetched from the project's raw-content base
//! URL when absent locally. Each individual failure is fatal: without the
//! templates Fix mode has nothing to seed from.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::layout::{CONFIG_SAMPLE_FILE, MANIFEST_SAMPLE_FILE, TEMPLATE_BASE_URL};
use crate::report;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetch `wp-config.sample.php` and `composer.sample.json` into `root` if
/// they are not already present.
pub fn fetch_templates(root: &Path) -> Result<()> {
    for file in [CONFIG_SAMPLE_FILE, MANIFEST_SAMPLE_FILE] {
        let local = root.join(file);
        if local.exists() {
            debug!(file, "template already present, skipping download");
            continue;
        }
        let url = format!("{TEMPLATE_BASE_URL}{file}");
        report::info(&format!("Downloading {file}..."));
        let body = fetch(&url).with_context(|| format!("download {file} from {url}"))?;
        fs::write(&local, body).with_context(|| format!("write {}", local.display()))?;
        report::success(&format!("Downloaded {file}"));
    }
    Ok(())
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .context("build http client")?;
    let response = client.get(url).send().context("send request")?;
    if !response.status().is_success() {
        return Err(anyhow!("unexpected status {}", response.status()));
    }
    Ok(response.bytes().context("read response body")?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_templates_are_not_downloaded() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(CONFIG_SAMPLE_FILE), "<?php").expect("write");
        fs::write(temp.path().join(MANIFEST_SAMPLE_FILE), "{}").expect("write");

        // No network reachable in tests; succeeding proves both were skipped.
        fetch_templates(temp.path()).expect("skip downloads");
    }
}

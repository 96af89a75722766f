//! Application-runtime collaborator, backed by WP-CLI.
//!
//! The pipeline never links against WordPress; it talks to the runtime
//! through this trait. The real implementation shells out to `wp`, test
//! doubles live in [`crate::test_support`].

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::types::ThemeInfo;
use crate::io::process::run_with_timeout;

const WP_TIMEOUT: Duration = Duration::from_secs(2 * 60);
const WP_OUTPUT_LIMIT_BYTES: usize = 200_000;

/// Capability surface of the application runtime.
pub trait WordPressRuntime {
    /// Load the environment; fails when the installation cannot boot.
    fn bootstrap(&self, root: &Path) -> Result<()>;
    fn installed_themes(&self, root: &Path) -> Result<Vec<ThemeInfo>>;
    /// Slug of the currently active theme.
    fn active_theme(&self, root: &Path) -> Result<String>;
    fn activate_theme(&self, root: &Path, slug: &str) -> Result<()>;
    fn clear_theme_cache(&self, root: &Path) -> Result<()>;
}

/// Runtime driven through the `wp` command-line client.
pub struct WpCli;

#[derive(Debug, Deserialize)]
struct WpTheme {
    name: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    parent: Option<String>,
}

impl WpCli {
    fn run(&self, root: &Path, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("wp");
        cmd.args(args).current_dir(root);
        let output = run_with_timeout(cmd, WP_TIMEOUT, WP_OUTPUT_LIMIT_BYTES)
            .with_context(|| format!("run wp {}", args.join(" ")))?;
        if !output.success() {
            return Err(anyhow!(
                "wp {} failed:\n{}",
                args.join(" "),
                output.combined()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl WordPressRuntime for WpCli {
    fn bootstrap(&self, root: &Path) -> Result<()> {
        self.run(root, &["core", "is-installed"]).map(|_| ())
    }

    fn installed_themes(&self, root: &Path) -> Result<Vec<ThemeInfo>> {
        let raw = self.run(
            root,
            &["theme", "list", "--format=json", "--fields=name,title,parent"],
        )?;
        let themes: Vec<WpTheme> =
            serde_json::from_str(raw.trim()).context("parse wp theme list output")?;
        Ok(themes
            .into_iter()
            .map(|theme| ThemeInfo {
                name: theme.title.unwrap_or_else(|| theme.name.clone()),
                slug: theme.name,
                parent: theme.parent.filter(|parent| !parent.is_empty()),
            })
            .collect())
    }

    fn active_theme(&self, root: &Path) -> Result<String> {
        let raw = self.run(root, &["option", "get", "stylesheet"])?;
        Ok(raw.trim().to_string())
    }

    fn activate_theme(&self, root: &Path, slug: &str) -> Result<()> {
        self.run(root, &["theme", "activate", slug]).map(|_| ())
    }

    fn clear_theme_cache(&self, root: &Path) -> Result<()> {
        self.run(root, &["cache", "flush"]).map(|_| ())
    }
}

//! In-process fakes for the pipeline's collaborators.
//!
//! Gated behind the `test-support` feature so integration tests can drive
//! the full pipeline without composer, WP-CLI, a database, or a terminal.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};

use crate::core::layout::{
    CONFIG_SAMPLE_FILE, CORE_LOAD_FILE, CORE_PLUGINS_DIR, CORE_SETTINGS_FILE, CORE_THEMES_DIR,
    MANIFEST_SAMPLE_FILE,
};
use crate::core::manifest::ManifestDefaults;
use crate::core::types::{DbCredentials, ProjectInput, SiteInput, ThemeInfo};
use crate::io::composer_file::{InstallOutcome, PackageManager};
use crate::io::db::DatabaseProbe;
use crate::io::input::InputSource;
use crate::io::wp_cli::WordPressRuntime;

/// Sample manifest as shipped, with unresolved placeholders.
pub const SAMPLE_COMPOSER_JSON: &str = r#"{
    "name": "<website-slug>/root",
    "require": {
        "johnpbloch/wordpress": "*"
    },
    "repositories": [
        { "type": "composer", "url": "https://jengo.repo.repman.io" },
        { "type": "vcs", "url": "git@github.com:jengo-agency/<website-repo-slug>" }
    ],
    "config": {
        "http-basic": {
            "jengo.repo.repman.io": { "username": "token", "password": "xxx" }
        }
    },
    "extra": { "wordpress-install-dir": "wp" }
}
"#;

/// Sample configuration with working credentials but no URL constants.
pub const SAMPLE_WP_CONFIG: &str = "<?php\n\
define( 'DB_NAME', 'project_db' );\n\
define( 'DB_USER', 'project_user' );\n\
define( 'DB_PASSWORD', 'project_secret' );\n\
define( 'DB_HOST', 'localhost' );\n\
$table_prefix = 'wp_';\n\
if ( ! defined( 'ABSPATH' ) ) {\n\
\tdefine( 'ABSPATH', __DIR__ . '/' );\n\
}\n\
require_once ABSPATH . 'wp-settings.php';\n";

/// Write both sample templates into `root`, as the downloader would.
pub fn seed_templates(root: &Path) {
    fs::write(root.join(MANIFEST_SAMPLE_FILE), SAMPLE_COMPOSER_JSON).expect("seed manifest sample");
    fs::write(root.join(CONFIG_SAMPLE_FILE), SAMPLE_WP_CONFIG).expect("seed config sample");
}

/// Package manager that materializes a minimal core tree instead of running
/// composer.
pub struct FakePackageManager {
    pub succeed: bool,
}

impl FakePackageManager {
    pub fn new() -> Self {
        Self { succeed: true }
    }
}

impl Default for FakePackageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageManager for FakePackageManager {
    fn install(&self, root: &Path) -> Result<InstallOutcome> {
        if !self.succeed {
            return Ok(InstallOutcome {
                success: false,
                output: "simulated install failure".to_string(),
            });
        }
        for dir in [CORE_THEMES_DIR, CORE_PLUGINS_DIR] {
            fs::create_dir_all(root.join(dir))?;
            fs::write(root.join(dir).join(".gitkeep"), "")?;
        }
        fs::write(root.join(CORE_SETTINGS_FILE), "<?php // settings\n")?;
        fs::write(root.join(CORE_LOAD_FILE), "<?php // load\n")?;
        fs::write(root.join("wp/wp-blog-header.php"), "<?php // header\n")?;
        Ok(InstallOutcome {
            success: true,
            output: String::new(),
        })
    }
}

/// Runtime fake with an in-memory theme table.
pub struct FakeWordPress {
    themes: Vec<ThemeInfo>,
    active: RefCell<String>,
    pub activations: RefCell<Vec<String>>,
}

impl FakeWordPress {
    pub fn new(themes: Vec<ThemeInfo>, active: &str) -> Self {
        Self {
            themes,
            active: RefCell::new(active.to_string()),
            activations: RefCell::new(Vec::new()),
        }
    }

    pub fn theme(slug: &str, parent: Option<&str>) -> ThemeInfo {
        ThemeInfo {
            slug: slug.to_string(),
            name: slug.to_string(),
            parent: parent.map(str::to_string),
        }
    }
}

impl WordPressRuntime for FakeWordPress {
    fn bootstrap(&self, root: &Path) -> Result<()> {
        if root.join(CORE_LOAD_FILE).exists() {
            Ok(())
        } else {
            Err(anyhow!("core not installed"))
        }
    }

    fn installed_themes(&self, _root: &Path) -> Result<Vec<ThemeInfo>> {
        Ok(self.themes.clone())
    }

    fn active_theme(&self, _root: &Path) -> Result<String> {
        Ok(self.active.borrow().clone())
    }

    fn activate_theme(&self, _root: &Path, slug: &str) -> Result<()> {
        self.activations.borrow_mut().push(slug.to_string());
        *self.active.borrow_mut() = slug.to_string();
        Ok(())
    }

    fn clear_theme_cache(&self, _root: &Path) -> Result<()> {
        Ok(())
    }
}

/// Database probe with a fixed verdict.
pub struct FakeDb {
    pub accept: bool,
}

impl DatabaseProbe for FakeDb {
    fn connect(&self, _root: &Path, credentials: &DbCredentials) -> Result<()> {
        if self.accept {
            Ok(())
        } else {
            Err(anyhow!(
                "connection refused for {}@{}",
                credentials.user,
                credentials.host
            ))
        }
    }
}

/// Input source returning canned answers.
pub struct FixedInput {
    pub project: ProjectInput,
    pub site: SiteInput,
    pub token: Option<String>,
}

impl FixedInput {
    pub fn new(slug: &str, repo_slug: &str, branch: &str, domain: &str) -> Self {
        Self {
            project: ProjectInput {
                website_slug: slug.to_string(),
                website_repo_slug: repo_slug.to_string(),
                branch_name: branch.to_string(),
            },
            site: SiteInput {
                website_domain: domain.to_string(),
            },
            token: Some("test-token".to_string()),
        }
    }
}

impl InputSource for FixedInput {
    fn project_input(&self, _defaults: &ManifestDefaults) -> Result<ProjectInput> {
        Ok(self.project.clone())
    }

    fn site_input(&self, _current_domain: Option<String>) -> Result<SiteInput> {
        Ok(self.site.clone())
    }

    fn registry_token(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }
}

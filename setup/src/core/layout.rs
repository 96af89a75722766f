//! The one hard-coded target layout this tool converges on.
//!
//! WordPress core lives under `wp/`, the project root holds `composer.json`,
//! `wp-config.php` and a thin front controller. These constants are the
//! single source of truth for paths, package names and sentinels; nothing
//! else in the crate hard-codes them.

/// Legacy top-level WordPress files/directories that must not remain in the
/// project root once core is installed under `wp/`.
pub const LEGACY_ROOT_FILES: &[&str] = &[
    "wp-admin",
    "wp-includes",
    "wp-activate.php",
    "wp-blog-header.php",
    "wp-comments-post.php",
    "wp-config-sample.php",
    "wp-cron.php",
    "wp-links-opml.php",
    "wp-load.php",
    "wp-login.php",
    "wp-mail.php",
    "wp-settings.php",
    "wp-signup.php",
    "wp-trackback.php",
    "xmlrpc.php",
    "license.txt",
    "readme.html",
    ".htaccess",
];

/// Core subdirectory holding the WordPress installation.
pub const CORE_DIR: &str = "wp";
/// File proving the core subdirectory holds a real installation.
pub const CORE_SETTINGS_FILE: &str = "wp/wp-settings.php";
/// Runtime bootstrap entry point.
pub const CORE_LOAD_FILE: &str = "wp/wp-load.php";
/// Theme/plugin directories shipped inside core that must stay empty.
pub const CORE_THEMES_DIR: &str = "wp/wp-content/themes";
pub const CORE_PLUGINS_DIR: &str = "wp/wp-content/plugins";

pub const MANIFEST_FILE: &str = "composer.json";
pub const MANIFEST_SAMPLE_FILE: &str = "composer.sample.json";
pub const CONFIG_FILE: &str = "wp-config.php";
pub const CONFIG_SAMPLE_FILE: &str = "wp-config.sample.php";
pub const FRONT_CONTROLLER: &str = "index.php";

/// Composer package providing WordPress core.
pub const CORE_PACKAGE: &str = "johnpbloch/wordpress";
/// Vendor namespace holding project theme packages.
pub const VENDOR_NAMESPACE: &str = "jengo-agency/";
/// Private Composer registry requiring an auth token.
pub const REGISTRY_HOST: &str = "jengo.repo.repman.io";
/// Base theme that must always be installed.
pub const BASE_THEME: &str = "jblank";
/// Sentinel meaning "credential was never supplied".
pub const PLACEHOLDER: &str = "xxx";
/// Placeholder tokens left in the sample manifest.
pub const MANIFEST_PLACEHOLDERS: &[&str] = &["<website-slug>", "<website-repo-slug>"];

/// Host-vendor must-use plugin that breaks subdirectory installs.
pub const VENDOR_MU_PLUGIN: &str = "wp-content/mu-plugins/kinsta-mu-plugins.php";

/// Home-relative logging directory and file checked in Phase 3.
pub const LOG_DIR: &str = "web";
pub const LOG_FILE: &str = "jlogger.log";

/// Remote base URL the sample templates are fetched from when absent.
pub const TEMPLATE_BASE_URL: &str =
    "https://raw.githubusercontent.com/jengo-agency/jblank-compowp/main/";

/// Path the front controller must load to bootstrap WordPress.
pub const FRONT_CONTROLLER_BOOTSTRAP: &str = "/wp/wp-blog-header.php";

/// Canonical front controller written when `index.php` is missing or points
/// at the wrong bootstrap path.
pub const FRONT_CONTROLLER_BODY: &str = r#"<?php
/**
 * Front to the WordPress application. This file doesn't do anything, but loads
 * wp-blog-header.php which does and tells WordPress to load the theme.
 *
 * @package WordPress
 */

/**
 * Tells WordPress to load the WordPress theme and output it.
 *
 * @var bool
 */
define( 'WP_USE_THEMES', true );

/** Loads the WordPress Environment and Template */
require __DIR__ . '/wp/wp-blog-header.php';
"#;

//! End-to-end pipeline runs against a temporary project tree, with every
//! external collaborator faked.

use std::fs;
use std::path::Path;

use wp_setup::core::types::Mode;
use wp_setup::phases::{Collaborators, run_pipeline};
use wp_setup::test_support::{
    FakeDb, FakePackageManager, FakeWordPress, FixedInput, seed_templates,
};

struct Harness {
    package_manager: FakePackageManager,
    wordpress: FakeWordPress,
    database: FakeDb,
    input: FixedInput,
}

impl Harness {
    fn new() -> Self {
        Self {
            package_manager: FakePackageManager::new(),
            wordpress: FakeWordPress::new(
                vec![
                    FakeWordPress::theme("jblank", None),
                    FakeWordPress::theme("acme-theme", Some("jblank")),
                    FakeWordPress::theme("twentytwenty", None),
                ],
                "twentytwenty",
            ),
            database: FakeDb { accept: true },
            input: FixedInput::new("acme", "acme-theme", "main", "https://acme.example"),
        }
    }

    fn collab(&self) -> Collaborators<'_> {
        Collaborators {
            package_manager: &self.package_manager,
            wordpress: &self.wordpress,
            database: &self.database,
            input: &self.input,
        }
    }

    fn run(&self, root: &Path, home: &Path, mode: Mode) -> anyhow::Result<()> {
        run_pipeline(root, home, mode, &self.collab()).map(|_| ())
    }
}

#[test]
fn check_mode_on_empty_directory_fails_on_missing_manifest() {
    let root = tempfile::tempdir().expect("root");
    let home = tempfile::tempdir().expect("home");
    let harness = Harness::new();

    let err = harness
        .run(root.path(), home.path(), Mode::Check)
        .expect_err("empty directory cannot pass");
    assert!(err.to_string().contains("composer.json"));
}

#[test]
fn fix_mode_converges_from_seeded_templates() {
    let root = tempfile::tempdir().expect("root");
    let home = tempfile::tempdir().expect("home");
    seed_templates(root.path());
    let harness = Harness::new();

    harness
        .run(root.path(), home.path(), Mode::Fix)
        .expect("fix run converges");

    let manifest = fs::read_to_string(root.path().join("composer.json")).expect("manifest");
    assert!(manifest.contains("\"acme/root\""));
    assert!(manifest.contains("jengo-agency/acme-theme"));
    assert!(manifest.contains("dev-main"));
    assert!(manifest.contains("test-token"));
    assert!(!manifest.contains("<website-slug>"));

    let config = fs::read_to_string(root.path().join("wp-config.php")).expect("config");
    assert!(config.contains("define('WP_HOME', 'https://acme.example');"));
    assert!(config.contains("define('WP_SITEURL', WP_HOME . '/wp');"));
    assert!(config.contains("define('ABSPATH', __DIR__ . '/wp/');"));
    assert!(config.contains("/vendor/autoload.php"));

    // The backup holds the pre-patch state copied from the sample.
    let backup = fs::read_to_string(root.path().join("wp-config.php.bak")).expect("backup");
    assert!(backup.contains("define( 'ABSPATH', __DIR__ . '/' );"));

    let index = fs::read_to_string(root.path().join("index.php")).expect("front controller");
    assert!(index.contains("/wp/wp-blog-header.php"));

    assert!(home.path().join("web/jlogger.log").exists());
    assert_eq!(
        harness.wordpress.activations.borrow().as_slice(),
        ["acme-theme"]
    );
}

#[test]
fn fix_mode_is_idempotent() {
    let root = tempfile::tempdir().expect("root");
    let home = tempfile::tempdir().expect("home");
    seed_templates(root.path());
    let harness = Harness::new();

    harness
        .run(root.path(), home.path(), Mode::Fix)
        .expect("first fix run");
    let manifest_first = fs::read(root.path().join("composer.json")).expect("manifest");
    let config_first = fs::read(root.path().join("wp-config.php")).expect("config");
    let backup_first = fs::read(root.path().join("wp-config.php.bak")).expect("backup");

    harness
        .run(root.path(), home.path(), Mode::Fix)
        .expect("second fix run");
    let manifest_second = fs::read(root.path().join("composer.json")).expect("manifest");
    let config_second = fs::read(root.path().join("wp-config.php")).expect("config");
    let backup_second = fs::read(root.path().join("wp-config.php.bak")).expect("backup");

    assert_eq!(manifest_first, manifest_second);
    assert_eq!(config_first, config_second);
    assert_eq!(backup_first, backup_second);
    // No second activation: the theme was already active.
    assert_eq!(
        harness.wordpress.activations.borrow().as_slice(),
        ["acme-theme"]
    );
}

#[test]
fn check_mode_passes_after_fix() {
    let root = tempfile::tempdir().expect("root");
    let home = tempfile::tempdir().expect("home");
    seed_templates(root.path());
    let harness = Harness::new();

    harness
        .run(root.path(), home.path(), Mode::Fix)
        .expect("fix run");
    harness
        .run(root.path(), home.path(), Mode::Check)
        .expect("check run after fix");
}

#[test]
fn check_mode_flags_drift_after_fix() {
    let root = tempfile::tempdir().expect("root");
    let home = tempfile::tempdir().expect("home");
    seed_templates(root.path());
    let harness = Harness::new();

    harness
        .run(root.path(), home.path(), Mode::Fix)
        .expect("fix run");

    // A legacy root file reappears.
    fs::write(root.path().join("wp-login.php"), "<?php").expect("write stray file");

    let err = harness
        .run(root.path(), home.path(), Mode::Check)
        .expect_err("drift must fail the check");
    assert!(err.to_string().contains("wp-login.php"));
}

#[test]
fn fix_mode_halts_when_install_fails() {
    let root = tempfile::tempdir().expect("root");
    let home = tempfile::tempdir().expect("home");
    seed_templates(root.path());
    let mut harness = Harness::new();
    harness.package_manager.succeed = false;

    let err = harness
        .run(root.path(), home.path(), Mode::Fix)
        .expect_err("install failure halts the run");
    assert!(err.to_string().contains("install failed"));
}

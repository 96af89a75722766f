//! Constant store parser and patcher for `wp-config.php`.
//!
//! The configuration file is treated as semi-structured text: the only rule
//! we understand is a line-oriented `define(NAME, EXPR);` statement. EXPR is
//! kept as an opaque source expression and compared by textual equality —
//! this is syntactic, not semantic, equality, matching how the file is
//! actually maintained. Everything outside touched `define()` statements is
//! preserved byte for byte.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::core::types::DbCredentials;

/// Required expression for the root-path constant.
pub const ABSPATH_EXPR: &str = "__DIR__ . '/wp/'";
/// Substring the root-path constant must reference.
pub const ABSPATH_MARKER: &str = "/wp/";
/// Statement that triggers environment bootstrap; `ABSPATH` must be defined
/// strictly before this line executes.
const SETTINGS_ANCHOR: &str = "require_once ABSPATH . 'wp-settings.php';";
/// Marker proving the composer autoloader is already wired in.
const AUTOLOAD_MARKER: &str = "/vendor/autoload.php";

const AUTOLOAD_SNIPPET: &str = "\n// Include Composer's autoloader\n\
if (file_exists(__DIR__ . '/vendor/autoload.php')) {\n    \
require_once __DIR__ . '/vendor/autoload.php';\n\
} else {\n    \
error_log('Composer autoloader not found. Please run \"composer install\".');\n\
}";

// Anchored per physical line; deliberately not scope-aware, so defines
// nested in conditionals are still matched.
static DEFINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*define\s*\(\s*['"]([A-Z0-9_]+)['"]\s*,\s*(.*?)\s*\)\s*;"#).unwrap()
});

/// Pattern matching the `define()` statement for one specific constant.
fn define_pattern(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?m)^\s*define\s*\(\s*['"]{}['"]\s*,\s*.*?\)\s*;"#,
        regex::escape(name)
    ))
    .expect("define pattern for escaped constant name")
}

/// Extract `NAME -> raw value expression` pairs from configuration text.
///
/// If a name is defined twice only the first occurrence is captured; that
/// occurrence is the one later patched. Zero matches is not an error.
pub fn parse_constants(text: &str) -> BTreeMap<String, String> {
    let mut store = BTreeMap::new();
    for caps in DEFINE_RE.captures_iter(text) {
        store
            .entry(caps[1].to_string())
            .or_insert_with(|| caps[2].trim().to_string());
    }
    store
}

/// The desired constant definitions, in definition order.
///
/// The domain (when supplied) drives three derived URL constants; the
/// content-directory constant is always required. `ABSPATH` is handled by
/// its own rule in [`patch_constants`].
pub fn required_definitions(domain: Option<&str>) -> Vec<(String, String)> {
    let mut defs = Vec::new();
    if let Some(domain) = domain {
        // WP_HOME must come first; the other two reference it.
        defs.push(("WP_HOME".to_string(), format!("'{domain}'")));
        defs.push(("WP_SITEURL".to_string(), "WP_HOME . '/wp'".to_string()));
        defs.push((
            "WP_CONTENT_URL".to_string(),
            "WP_HOME . '/wp-content'".to_string(),
        ));
    }
    defs.push((
        "WP_CONTENT_DIR".to_string(),
        "__DIR__ . '/wp-content'".to_string(),
    ));
    defs
}

/// Result of a patch pass over configuration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub content: String,
    pub changed: bool,
    /// Constants corrected in place.
    pub corrected: Vec<String>,
    /// Constants staged into the prepended block.
    pub added: Vec<String>,
}

/// Converge configuration text on the required definitions.
///
/// Three passes, in order:
/// 1. correct existing-but-wrong definitions in place (first occurrence
///    only, single statement replaced);
/// 2. stage missing definitions, plus the composer-autoload boilerplate if
///    the file does not reference it, into a `<?php ... ?>` block prepended
///    before the original opening tag so the new constants are defined
///    before anything else executes;
/// 3. apply the dedicated `ABSPATH` rule: targeted replace when present but
///    pointing elsewhere, otherwise injected immediately before the
///    bootstrap anchor (it must be defined before that line runs). If the
///    anchor is absent the definition is appended at end of file.
pub fn patch_constants(content: &str, required: &[(String, String)]) -> Patch {
    let existing = parse_constants(content);
    let mut content = content.to_string();
    let mut corrected = Vec::new();
    let mut added = Vec::new();
    let mut staged: Vec<String> = Vec::new();
    let mut changed = false;

    for (name, value) in required {
        match existing.get(name) {
            Some(current) if current != value => {
                let replacement = format!("define('{name}', {value});");
                let pattern = define_pattern(name);
                if pattern.is_match(&content) {
                    content = pattern
                        .replace(&content, NoExpand(replacement.as_str()))
                        .into_owned();
                    corrected.push(name.clone());
                    changed = true;
                }
            }
            Some(_) => {}
            None => {
                staged.push(format!("define('{name}', {value});"));
                added.push(name.clone());
            }
        }
    }

    if !content.contains(AUTOLOAD_MARKER) {
        staged.push(AUTOLOAD_SNIPPET.to_string());
    }

    if !staged.is_empty() {
        content = format!("<?php\n{}\n?>\n\n{content}", staged.join("\n"));
        changed = true;
    }

    let abspath_ok = existing
        .get("ABSPATH")
        .is_some_and(|expr| expr.contains(ABSPATH_MARKER));
    if !abspath_ok {
        let line = format!("define('ABSPATH', {ABSPATH_EXPR});");
        let pattern = define_pattern("ABSPATH");
        if pattern.is_match(&content) {
            content = pattern
                .replace(&content, NoExpand(line.as_str()))
                .into_owned();
            corrected.push("ABSPATH".to_string());
        } else if content.contains(SETTINGS_ANCHOR) {
            let block = format!(
                "/** Absolute path to the WordPress directory. */\n{line}\n\n{SETTINGS_ANCHOR}"
            );
            content = content.replacen(SETTINGS_ANCHOR, &block, 1);
            added.push("ABSPATH".to_string());
        } else {
            // No bootstrap anchor to hook onto: append at end of file.
            if !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str("\n/** Absolute path to the WordPress directory. */\n");
            content.push_str(&line);
            content.push('\n');
            added.push("ABSPATH".to_string());
        }
        changed = true;
    }

    Patch {
        content,
        changed,
        corrected,
        added,
    }
}

/// Re-parse patched text and report every deviation from the required
/// definitions, including the root-path rule.
pub fn validate_constants(content: &str, required: &[(String, String)]) -> Vec<String> {
    let store = parse_constants(content);
    let mut errors = Vec::new();

    for (name, value) in required {
        match store.get(name) {
            None => errors.push(format!("constant '{name}' is missing")),
            Some(found) if found != value => errors.push(format!(
                "constant '{name}' is incorrect: found {found}, expected {value}"
            )),
            Some(_) => {}
        }
    }

    let abspath_ok = store
        .get("ABSPATH")
        .is_some_and(|expr| expr.contains(ABSPATH_MARKER));
    if !abspath_ok {
        errors.push(format!(
            "constant 'ABSPATH' is missing or does not point into the '{ABSPATH_MARKER}' directory"
        ));
    }

    errors
}

/// Strip one layer of surrounding quotes from a raw value expression.
///
/// Only meaningful for plain string literals; concatenation expressions are
/// returned as-is.
pub fn strip_quotes(raw: &str) -> &str {
    raw.trim_matches(|c| c == '\'' || c == '"')
}

/// Database credentials from a parsed constant store, or `None` when any of
/// the four constants is undefined.
pub fn db_credentials(store: &BTreeMap<String, String>) -> Option<DbCredentials> {
    Some(DbCredentials {
        host: strip_quotes(store.get("DB_HOST")?).to_string(),
        user: strip_quotes(store.get("DB_USER")?).to_string(),
        password: strip_quotes(store.get("DB_PASSWORD")?).to_string(),
        name: strip_quotes(store.get("DB_NAME")?).to_string(),
    })
}

/// Current site URL from the store, for prompt defaults.
pub fn current_home(store: &BTreeMap<String, String>) -> Option<String> {
    store
        .get("WP_HOME")
        .map(|raw| strip_quotes(raw).to_string())
}

//! Dependency manifest (`composer.json`) edits.
//!
//! The manifest is deserialized into a typed shape for the keys this tool
//! manages; every other key round-trips untouched through the flattened
//! `extra` map. All edits here are pure; loading and writing live in
//! [`crate::io::composer_file`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::core::layout::{
    CORE_PACKAGE, MANIFEST_PLACEHOLDERS, PLACEHOLDER, REGISTRY_HOST, VENDOR_NAMESPACE,
};

/// Package-manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub require: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<Repository>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub config: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the `repositories` source list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Prompt defaults recovered from an existing manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDefaults {
    pub website_slug: Option<String>,
    pub website_repo_slug: Option<String>,
    pub branch_name: Option<String>,
}

impl Manifest {
    /// Add a wildcard requirement for the core package if absent.
    /// Returns whether the manifest was modified.
    pub fn ensure_core_dependency(&mut self) -> bool {
        if self.require.contains_key(CORE_PACKAGE) {
            return false;
        }
        self.require
            .insert(CORE_PACKAGE.to_string(), Value::String("*".to_string()));
        true
    }

    pub fn has_core_dependency(&self) -> bool {
        self.require.contains_key(CORE_PACKAGE)
    }

    /// Whether a usable (non-empty, non-placeholder) private-registry token
    /// is configured.
    pub fn has_registry_token(&self) -> bool {
        self.config
            .pointer(&format!("/http-basic/{REGISTRY_HOST}/password"))
            .and_then(Value::as_str)
            .is_some_and(|password| !password.is_empty() && password != PLACEHOLDER)
    }

    pub fn set_registry_token(&mut self, token: &str) {
        if !self.config.is_object() {
            self.config = json!({});
        }
        let config = self
            .config
            .as_object_mut()
            .expect("config was just made an object");
        let http_basic = config
            .entry("http-basic")
            .or_insert_with(|| json!({}));
        if !http_basic.is_object() {
            *http_basic = json!({});
        }
        http_basic
            .as_object_mut()
            .expect("http-basic was just made an object")
            .insert(
                REGISTRY_HOST.to_string(),
                json!({ "username": "token", "password": token }),
            );
    }

    /// Set the project package name to `<slug>/root`.
    pub fn set_project_name(&mut self, website_slug: &str) {
        self.name = Some(format!("{website_slug}/root"));
    }

    /// Install the project theme dependency pinned to `dev-<branch>`.
    ///
    /// Any existing dependency under the vendor namespace is removed first,
    /// and the VCS source descriptor for the vendor is updated in place when
    /// one exists (matched by namespace substring) — appending only when no
    /// match is found, so re-runs never accumulate duplicate entries.
    pub fn set_project_dependency(&mut self, repo_slug: &str, branch: &str) {
        let stale: Vec<String> = self
            .require
            .keys()
            .filter(|pkg| pkg.starts_with(VENDOR_NAMESPACE))
            .cloned()
            .collect();
        for pkg in stale {
            self.require.remove(&pkg);
        }
        self.require.insert(
            format!("{VENDOR_NAMESPACE}{repo_slug}"),
            Value::String(format!("dev-{branch}")),
        );

        let url = format!("git@github.com:{VENDOR_NAMESPACE}{repo_slug}");
        let vendor = VENDOR_NAMESPACE.trim_end_matches('/');
        match self
            .repositories
            .iter_mut()
            .find(|repo| repo.kind == "vcs" && repo.url.contains(vendor))
        {
            Some(repo) => repo.url = url,
            None => self.repositories.push(Repository {
                kind: "vcs".to_string(),
                url,
                extra: Map::new(),
            }),
        }
    }

    /// Whether unresolved sample placeholders remain anywhere in the
    /// manifest.
    pub fn has_placeholders(&self) -> bool {
        match serde_json::to_string(self) {
            Ok(serialized) => MANIFEST_PLACEHOLDERS
                .iter()
                .any(|token| serialized.contains(token)),
            Err(_) => false,
        }
    }

    /// Theme package slugs under the vendor namespace (candidates for the
    /// expected project theme).
    pub fn theme_candidates(&self) -> Vec<String> {
        self.require
            .keys()
            .filter_map(|pkg| pkg.strip_prefix(VENDOR_NAMESPACE))
            .map(str::to_string)
            .collect()
    }

    /// Recover prompt defaults from the manifest, mirroring what a previous
    /// run wrote: package name → website slug, vendor VCS url → repo slug,
    /// `dev-<branch>` constraint → branch name.
    pub fn defaults(&self) -> ManifestDefaults {
        let vendor = VENDOR_NAMESPACE.trim_end_matches('/');

        let website_slug = self
            .name
            .as_deref()
            .and_then(|name| name.split('/').next())
            .map(|slug| slug.replace("<website-slug>", ""))
            .filter(|slug| !slug.is_empty());

        let website_repo_slug = self
            .repositories
            .iter()
            .find(|repo| repo.url.contains(vendor))
            .and_then(|repo| repo.url.rsplit('/').next())
            .map(|name| {
                name.trim_end_matches(".git")
                    .replace("<website-repo-slug>", "")
            })
            .filter(|slug| !slug.is_empty());

        let branch_name = self
            .require
            .iter()
            .filter(|(pkg, _)| pkg.starts_with(VENDOR_NAMESPACE))
            .find_map(|(_, version)| {
                version
                    .as_str()
                    .filter(|v| *v != "*")
                    .and_then(|v| v.strip_prefix("dev-"))
                    .map(str::to_string)
            });

        ManifestDefaults {
            website_slug,
            website_repo_slug,
            branch_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Manifest {
        serde_json::from_value(json!({
            "name": "<website-slug>/root",
            "require": {
                "johnpbloch/wordpress": "*",
                "jengo-agency/old-theme": "dev-main"
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
        }))
        .expect("sample manifest")
    }

    #[test]
    fn unknown_keys_round_trip() {
        let manifest = sample();
        assert_eq!(
            manifest.extra.get("extra").and_then(|e| e.pointer("/wordpress-install-dir")),
            Some(&json!("wp"))
        );
        let serialized = serde_json::to_value(&manifest).expect("serialize");
        assert_eq!(
            serialized.pointer("/extra/wordpress-install-dir"),
            Some(&json!("wp"))
        );
    }

    #[test]
    fn ensure_core_dependency_is_idempotent() {
        let mut manifest = Manifest::default();
        assert!(manifest.ensure_core_dependency());
        assert!(!manifest.ensure_core_dependency());
        assert_eq!(manifest.require.get(CORE_PACKAGE), Some(&json!("*")));
    }

    #[test]
    fn placeholder_token_is_not_a_usable_token() {
        let mut manifest = sample();
        assert!(!manifest.has_registry_token());
        manifest.set_registry_token("real-token");
        assert!(manifest.has_registry_token());
    }

    #[test]
    fn set_registry_token_creates_missing_config_sections() {
        let mut manifest = Manifest::default();
        manifest.set_registry_token("tok");
        assert_eq!(
            manifest
                .config
                .pointer("/http-basic/jengo.repo.repman.io/password"),
            Some(&json!("tok"))
        );
    }

    #[test]
    fn project_dependency_swap_removes_old_and_updates_vcs_source() {
        let mut manifest = sample();
        manifest.set_project_dependency("acme-theme", "feature");

        assert!(!manifest.require.contains_key("jengo-agency/old-theme"));
        assert_eq!(
            manifest.require.get("jengo-agency/acme-theme"),
            Some(&json!("dev-feature"))
        );
        let vcs: Vec<&Repository> = manifest
            .repositories
            .iter()
            .filter(|r| r.kind == "vcs")
            .collect();
        assert_eq!(vcs.len(), 1);
        assert_eq!(vcs[0].url, "git@github.com:jengo-agency/acme-theme");
    }

    #[test]
    fn project_dependency_is_idempotent_across_reruns() {
        let mut manifest = sample();
        manifest.set_project_dependency("acme-theme", "main");
        let after_first = manifest.clone();
        manifest.set_project_dependency("acme-theme", "main");
        assert_eq!(manifest, after_first);
        assert_eq!(manifest.repositories.len(), 2);
    }

    #[test]
    fn vcs_source_appended_when_no_vendor_match() {
        let mut manifest = Manifest::default();
        manifest.set_project_dependency("acme-theme", "main");
        assert_eq!(manifest.repositories.len(), 1);
        assert_eq!(manifest.repositories[0].kind, "vcs");
    }

    #[test]
    fn placeholders_detected_until_resolved() {
        let mut manifest = sample();
        assert!(manifest.has_placeholders());
        manifest.set_project_name("acme");
        manifest.set_project_dependency("acme-theme", "main");
        assert!(!manifest.has_placeholders());
    }

    #[test]
    fn theme_candidates_are_vendor_namespaced_slugs() {
        let manifest = sample();
        assert_eq!(manifest.theme_candidates(), vec!["old-theme"]);
    }

    #[test]
    fn defaults_recovered_from_previous_run() {
        let mut manifest = sample();
        manifest.set_project_name("acme");
        manifest.set_project_dependency("acme-theme", "develop");

        let defaults = manifest.defaults();
        assert_eq!(defaults.website_slug.as_deref(), Some("acme"));
        assert_eq!(defaults.website_repo_slug.as_deref(), Some("acme-theme"));
        assert_eq!(defaults.branch_name.as_deref(), Some("develop"));
    }

    #[test]
    fn defaults_empty_for_placeholder_manifest() {
        let defaults = sample().defaults();
        assert_eq!(defaults.website_slug, None);
        assert_eq!(defaults.website_repo_slug, None);
        assert_eq!(defaults.branch_name.as_deref(), Some("main"));
    }
}

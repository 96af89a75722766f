//! User input strategy: interactive prompts or environment lookups.
//!
//! The strategy is selected once at startup (tty detection) and injected
//! into the pipeline, so no component probes the terminal itself.

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Context, Result};

use crate::core::manifest::ManifestDefaults;
use crate::core::types::{ProjectInput, SiteInput};
use crate::report;

pub const ENV_WEBSITE_SLUG: &str = "WP_SETUP_WEBSITE_SLUG";
pub const ENV_WEBSITE_REPO_SLUG: &str = "WP_SETUP_WEBSITE_REPO_SLUG";
pub const ENV_BRANCH_NAME: &str = "WP_SETUP_BRANCH_NAME";
pub const ENV_REGISTRY_TOKEN: &str = "WP_SETUP_REPMAN_TOKEN";
pub const ENV_WEBSITE_DOMAIN: &str = "WP_SETUP_WEBSITE_DOMAIN";

const DEFAULT_WEBSITE_SLUG: &str = "mywebsite";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_DOMAIN: &str = "https://example.com";

/// Source of user-supplied parameters.
pub trait InputSource {
    /// Composer identity: website slug, theme repo slug, branch.
    fn project_input(&self, defaults: &ManifestDefaults) -> Result<ProjectInput>;
    /// Site identity: the site URL.
    fn site_input(&self, current_domain: Option<String>) -> Result<SiteInput>;
    /// Private-registry token, `None` when unavailable.
    fn registry_token(&self) -> Result<Option<String>>;
}

/// Pick the strategy once at startup: prompts on a tty, environment
/// variables (with documented defaults) otherwise.
pub fn detect() -> Box<dyn InputSource> {
    if std::io::stdin().is_terminal() {
        Box::new(InteractivePrompt)
    } else {
        Box::new(EnvironmentInput)
    }
}

/// Prompts on stdin, offering defaults recovered from previous runs.
pub struct InteractivePrompt;

impl InputSource for InteractivePrompt {
    fn project_input(&self, defaults: &ManifestDefaults) -> Result<ProjectInput> {
        let repo_default = defaults
            .website_repo_slug
            .clone()
            .unwrap_or_else(|| "mytheme-theme".to_string());
        let website_repo_slug = sluggify(&prompt("Enter theme repo slug", &repo_default)?);

        let slug_default = defaults
            .website_slug
            .clone()
            .unwrap_or_else(|| website_repo_slug.clone());
        let website_slug = sluggify(&prompt("Enter repository name", &slug_default)?);

        let branch_default = defaults
            .branch_name
            .clone()
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        let branch_name = prompt("Enter Git branch name (e.g., main, develop)", &branch_default)?;

        Ok(ProjectInput {
            website_slug,
            website_repo_slug,
            branch_name,
        })
    }

    fn site_input(&self, current_domain: Option<String>) -> Result<SiteInput> {
        let default = current_domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
        let answer = prompt("Enter website URL (e.g., https://example.com)", &default)?;
        Ok(SiteInput {
            website_domain: normalize_domain(&answer),
        })
    }

    fn registry_token(&self) -> Result<Option<String>> {
        let token = prompt("Enter private registry token", "")?;
        Ok((!token.is_empty()).then_some(token))
    }
}

/// Environment variables with documented defaults, for non-interactive runs.
pub struct EnvironmentInput;

impl InputSource for EnvironmentInput {
    fn project_input(&self, defaults: &ManifestDefaults) -> Result<ProjectInput> {
        let website_slug = env_or(ENV_WEBSITE_SLUG)
            .or_else(|| defaults.website_slug.clone())
            .unwrap_or_else(|| DEFAULT_WEBSITE_SLUG.to_string());
        let website_repo_slug = env_or(ENV_WEBSITE_REPO_SLUG)
            .or_else(|| defaults.website_repo_slug.clone())
            .unwrap_or_else(|| format!("{website_slug}-theme"));
        let branch_name = env_or(ENV_BRANCH_NAME)
            .or_else(|| defaults.branch_name.clone())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        report::warning("Running in non-interactive mode. Using defaults:");
        report::warning(&format!("Website slug: {website_slug}"));
        report::warning(&format!("Theme repo slug: {website_repo_slug}"));
        report::warning(&format!("Branch name: {branch_name}"));
        report::warning(&format!(
            "Set {ENV_WEBSITE_SLUG}, {ENV_WEBSITE_REPO_SLUG}, and {ENV_BRANCH_NAME} to customize."
        ));

        Ok(ProjectInput {
            website_slug: sluggify(&website_slug),
            website_repo_slug: sluggify(&website_repo_slug),
            branch_name,
        })
    }

    fn site_input(&self, current_domain: Option<String>) -> Result<SiteInput> {
        let website_domain = env_or(ENV_WEBSITE_DOMAIN)
            .or(current_domain)
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());

        report::warning(&format!(
            "Non-interactive mode: using website domain {website_domain} \
             (set {ENV_WEBSITE_DOMAIN} to customize)"
        ));

        Ok(SiteInput {
            website_domain: normalize_domain(&website_domain),
        })
    }

    fn registry_token(&self) -> Result<Option<String>> {
        Ok(env_or(ENV_REGISTRY_TOKEN))
    }
}

fn env_or(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn prompt(label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        print!("{label}: ");
    } else {
        print!("{label} [{default}]: ");
    }
    std::io::stdout().flush().context("flush prompt")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read prompt answer")?;
    let answer = line.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

/// Normalize a slug: lowercase, dashes for anything non-alphanumeric.
pub fn sluggify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = false;
    for c in input.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        DEFAULT_WEBSITE_SLUG.to_string()
    } else {
        slug
    }
}

/// Prefix `https://` when the protocol is missing.
pub fn normalize_domain(domain: &str) -> String {
    if domain.is_empty() {
        return DEFAULT_DOMAIN.to_string();
    }
    let lower = domain.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sluggify_normalizes() {
        assert_eq!(sluggify("My Site!"), "my-site");
        assert_eq!(sluggify("--Already--Sluggy--"), "already-sluggy");
        assert_eq!(sluggify("a__b..c"), "a-b-c");
        assert_eq!(sluggify(""), "mywebsite");
        assert_eq!(sluggify("!!!"), "mywebsite");
    }

    #[test]
    fn normalize_domain_adds_protocol() {
        assert_eq!(normalize_domain("example.com"), "https://example.com");
        assert_eq!(normalize_domain("https://example.com"), "https://example.com");
        assert_eq!(normalize_domain("HTTP://example.com"), "HTTP://example.com");
        assert_eq!(normalize_domain(""), "https://example.com");
    }
}

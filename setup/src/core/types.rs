//! Shared types threaded through the setup pipeline.

use std::fmt;

/// Run mode, fixed for the process lifetime.
///
/// Every mutating operation is gated on this value; it is passed explicitly
/// rather than read from ambient state so each helper stays testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Read-only: report deviations, exit non-zero on any unmet condition.
    Check,
    /// Mutating: apply corrections, then re-validate.
    Fix,
}

impl Mode {
    pub fn is_fix(self) -> bool {
        matches!(self, Mode::Fix)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Check => write!(f, "CHECK"),
            Mode::Fix => write!(f, "FIX"),
        }
    }
}

/// User input gathered before Phase 1 (composer identity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInput {
    /// Project slug, becomes the manifest package name `<slug>/root`.
    pub website_slug: String,
    /// Theme repository slug under the vendor namespace.
    pub website_repo_slug: String,
    /// Git branch the theme dependency is pinned to (`dev-<branch>`).
    pub branch_name: String,
}

/// User input gathered before Phase 2 (site identity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInput {
    /// Full site URL including protocol, e.g. `https://example.com`.
    pub website_domain: String,
}

/// An installed theme as reported by the application runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInfo {
    pub slug: String,
    pub name: String,
    /// Parent theme slug for child themes.
    pub parent: Option<String>,
}

/// Database credentials extracted from the configuration constant store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCredentials {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
}

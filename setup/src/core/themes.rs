//! Project-theme resolution from manifest candidates.

use crate::core::types::ThemeInfo;

/// Resolution of the expected project theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectTheme {
    /// Unambiguous choice.
    Resolved(String),
    /// No clear parent/child pair was found; first candidate chosen.
    /// Callers must surface a warning, since this may activate the wrong
    /// theme.
    Fallback(String),
}

impl ProjectTheme {
    pub fn slug(&self) -> &str {
        match self {
            ProjectTheme::Resolved(slug) | ProjectTheme::Fallback(slug) => slug,
        }
    }
}

/// Determine the expected project theme among the manifest's namespaced
/// candidates.
///
/// With several candidates, the child of a parent/child pair wins: we look
/// for a candidate whose installed parent theme is also a candidate. If no
/// such pair exists the first candidate is returned as a fallback.
pub fn expected_project_theme(
    candidates: &[String],
    installed: &[ThemeInfo],
) -> Option<ProjectTheme> {
    let first = candidates.first()?;
    if candidates.len() == 1 {
        return Some(ProjectTheme::Resolved(first.clone()));
    }

    for slug in candidates {
        let parent = installed
            .iter()
            .find(|theme| &theme.slug == slug)
            .and_then(|theme| theme.parent.as_deref());
        if let Some(parent) = parent
            && candidates.iter().any(|candidate| candidate == parent)
        {
            return Some(ProjectTheme::Resolved(slug.clone()));
        }
    }

    Some(ProjectTheme::Fallback(first.clone()))
}

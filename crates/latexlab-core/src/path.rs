//! Name and path validation
//!
//! Template names and workflow project names end up as file names, so they
//! must be a single path component. `Path::is_absolute()` alone is not
//! enough: on Windows `/tmp` is rooted but not absolute, so checks are done
//! on components.

use crate::error::{LatexlabError, Result};
use std::path::{Component, Path};

/// Check if path is absolute OR rooted (cross-platform)
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use latexlab_core::path::has_absolute_or_rooted_component;
///
/// assert!(has_absolute_or_rooted_component(Path::new("/tmp")));
/// assert!(!has_absolute_or_rooted_component(Path::new("templates/report")));
/// ```
pub fn has_absolute_or_rooted_component(path: &Path) -> bool {
    if path.is_absolute() {
        return true;
    }

    path.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

/// Validate a template name
///
/// Blocks empty names, absolute paths, `.`/`..` and anything with a path
/// separator.
///
/// # Examples
///
/// ```
/// # use latexlab_core::path::validate_name;
/// assert!(validate_name("homework").is_ok());
/// assert!(validate_name("../../../etc/passwd").is_err());
/// assert!(validate_name("/tmp/malicious").is_err());
/// assert!(validate_name("reports/q1").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LatexlabError::InvalidName("name cannot be empty".to_string()));
    }

    let path = Path::new(name);

    if has_absolute_or_rooted_component(path) {
        return Err(LatexlabError::InvalidName(format!(
            "name cannot be an absolute path: '{}'",
            name
        )));
    }

    let mut normal_count = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal_count += 1,
            Component::CurDir | Component::ParentDir => {
                return Err(LatexlabError::InvalidName(format!(
                    "name cannot contain '.' or '..': '{}'",
                    name
                )));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(LatexlabError::InvalidName(format!(
                    "name cannot be an absolute path: '{}'",
                    name
                )));
            }
        }
    }

    if normal_count != 1 || name.contains('/') || name.contains('\\') {
        return Err(LatexlabError::InvalidName(format!(
            "name must not contain path separators: '{}'",
            name
        )));
    }

    Ok(())
}

/// Turn a document title into a file stem: `My Report` → `my_report`
///
/// Characters outside `[a-z0-9_-]` become `_`. Falls back to `document`.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if slug.trim_matches('_').is_empty() {
        "document".to_string()
    } else {
        slug
    }
}

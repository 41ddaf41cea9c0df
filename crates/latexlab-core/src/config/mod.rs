//! Optional project configuration (`latexlab.toml`)

mod model;

pub use model::{CompileConfig, ProjectConfig, TemplatesConfig};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// File name of the project configuration
pub const CONFIG_FILE: &str = "latexlab.toml";

/// A project configuration together with the directory it was found in
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl LoadedConfig {
    /// Template directory with relative paths resolved against `root`
    pub fn template_dir(&self) -> PathBuf {
        if self.config.templates.dir.is_absolute() {
            self.config.templates.dir.clone()
        } else {
            self.root.join(&self.config.templates.dir)
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }
}

/// Walk up from `start` looking for latexlab.toml
///
/// Returns `Ok(None)` when no ancestor has one.
pub fn discover(start: &Path) -> Result<Option<LoadedConfig>> {
    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "found project config");
            let config = ProjectConfig::from_file(&candidate)?;
            return Ok(Some(LoadedConfig {
                root: dir.to_path_buf(),
                config,
            }));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use latexlab_testkit::temp_dir_in_workspace;

    #[test]
    fn test_discover_walks_up() {
        let temp = temp_dir_in_workspace();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            "[templates]\ndir = \"tpl\"\n",
        )
        .unwrap();
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let loaded = discover(&nested).unwrap().unwrap();
        assert_eq!(loaded.root, temp.path());
        assert_eq!(loaded.template_dir(), temp.path().join("tpl"));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp = temp_dir_in_workspace();
        std::fs::write(temp.path().join(CONFIG_FILE), "[templates\n").unwrap();

        let err = discover(temp.path()).unwrap_err();
        assert!(err.to_string().starts_with("PROJECT_CONFIG_INVALID"));
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(CONFIG_FILE);
        let mut config = ProjectConfig::default();
        config.compile.open = true;

        config.to_file(&path).unwrap();
        assert_eq!(ProjectConfig::from_file(&path).unwrap(), config);
    }
}

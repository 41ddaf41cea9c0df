use crate::compile::LatexEngine;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// latexlab.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub compile: CompileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplatesConfig {
    /// Template directory, relative to the directory holding latexlab.toml
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
        }
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompileConfig {
    #[serde(default)]
    pub engine: LatexEngine,
    /// Open the PDF after a successful compile
    #[serde(default)]
    pub open: bool,
}

impl ProjectConfig {
    /// latexlab.toml を読み込む
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| crate::error::LatexlabError::ProjectConfigInvalid(e.to_string()))
    }

    /// latexlab.toml に書き込む
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LatexlabError::ProjectConfigInvalid(e.to_string()))?;

        std::fs::write(path.as_ref(), content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert_eq!(config.templates.dir, PathBuf::from("templates"));
        assert_eq!(config.compile.engine, LatexEngine::Auto);
        assert!(!config.compile.open);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[templates]
dir = "tex/templates"

[compile]
engine = "xelatex"
open = true
"#;
        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.templates.dir, PathBuf::from("tex/templates"));
        assert_eq!(config.compile.engine, LatexEngine::Xelatex);
        assert!(config.compile.open);
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        let result: Result<ProjectConfig, _> = toml::from_str("[compile]\nengine = \"context\"\n");
        assert!(result.is_err());
    }
}

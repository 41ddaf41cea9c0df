//! Template directory initialisation and workflow project folders

use crate::assets::AssetStore;
use crate::error::Result;
use crate::template::{CONFIG_EXTENSION, TEMPLATE_EXTENSION};
use std::fs;
use std::path::{Path, PathBuf};

/// A template shipped inside the binary
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTemplate {
    pub name: &'static str,
    pub source: &'static str,
    pub config: &'static str,
}

/// Templates written by `latexlab init`
pub const BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "example",
        source: include_str!("../../builtin_templates/example.tex.j2"),
        config: include_str!("../../builtin_templates/example.yaml"),
    },
    BuiltinTemplate {
        name: "homework",
        source: include_str!("../../builtin_templates/homework.tex.j2"),
        config: include_str!("../../builtin_templates/homework.yaml"),
    },
];

/// Get builtin template by name
pub fn get_builtin_template(name: &str) -> Option<&'static BuiltinTemplate> {
    BUILTIN_TEMPLATES.iter().find(|t| t.name == name)
}

/// Outcome of [`init_template_dir`]
#[derive(Debug, Default)]
pub struct InitReport {
    pub created: Vec<PathBuf>,
    /// Files left alone because they already existed
    pub skipped: Vec<PathBuf>,
}

/// Populate `dir` with the builtin templates
///
/// Existing files are kept unless `force` is set.
pub fn init_template_dir(dir: &Path, force: bool) -> Result<InitReport> {
    fs::create_dir_all(dir)?;
    let mut report = InitReport::default();

    for builtin in BUILTIN_TEMPLATES {
        let files = [
            (TEMPLATE_EXTENSION, builtin.source),
            (CONFIG_EXTENSION, builtin.config),
        ];
        for (extension, content) in files {
            let path = dir.join(format!("{}{}", builtin.name, extension));
            if path.exists() && !force {
                tracing::debug!(path = %path.display(), "keeping existing file");
                report.skipped.push(path);
                continue;
            }
            fs::write(&path, content)?;
            report.created.push(path);
        }
    }

    Ok(report)
}

/// Folder structure of a workflow project
///
/// ```text
/// <root>/
///   assets/fonts/
///   assets/images/
///   output/
/// ```
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    assets: AssetStore,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            assets: AssetStore::new(&root),
            root,
        }
    }

    /// Create every directory of the layout (idempotent)
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let layout = Self::new(root);
        layout.assets.ensure_dirs()?;
        fs::create_dir_all(layout.output_dir())?;
        tracing::debug!(root = %layout.root.display(), "project layout ready");
        Ok(layout)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// `output/<name>.tex`
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir().join(format!("{}.tex", name))
    }
}

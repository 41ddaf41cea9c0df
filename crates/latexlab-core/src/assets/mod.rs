//! Fonts and images bundled with a workflow project

use crate::error::{LatexlabError, Result};
use crate::validate::RenderContext;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Kind of asset, which decides its folder under `assets/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Font,
    Image,
}

impl AssetKind {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Font => &["otf", "ttf", "woff", "woff2"],
            AssetKind::Image => &["png", "jpg", "jpeg", "pdf", "eps", "svg"],
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            AssetKind::Font => "fonts",
            AssetKind::Image => "images",
        }
    }

    /// Case-insensitive extension match
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions().contains(&e.as_str())
            })
            .unwrap_or(false)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Font => f.write_str("font"),
            AssetKind::Image => f.write_str("image"),
        }
    }
}

/// A file stored under `assets/`
#[derive(Debug, Clone, Serialize)]
pub struct AssetEntry {
    pub kind: AssetKind,
    pub name: String,
    pub size: u64,
}

/// The `assets/` folder of a project root
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            root: project_root.into(),
        }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn dir(&self, kind: AssetKind) -> PathBuf {
        self.assets_dir().join(kind.dir_name())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(self.dir(AssetKind::Font))?;
        fs::create_dir_all(self.dir(AssetKind::Image))?;
        Ok(())
    }

    /// Copy one file into the folder for `kind`
    ///
    /// An existing file of the same name is kept unless `overwrite` is set.
    /// Files with an unexpected extension are copied with a warning.
    pub fn import_file(&self, kind: AssetKind, source: &Path, overwrite: bool) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(LatexlabError::AssetNotFound(source.to_path_buf()));
        }
        if !kind.matches(source) {
            tracing::warn!(
                path = %source.display(),
                "{} may not be a valid {} file",
                source.display(),
                kind
            );
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| LatexlabError::AssetNotFound(source.to_path_buf()))?;
        let destination = self.dir(kind).join(file_name);
        fs::create_dir_all(self.dir(kind))?;

        if destination.exists() && !overwrite {
            tracing::debug!(path = %destination.display(), "asset already present");
            return Ok(destination);
        }

        fs::copy(source, &destination)?;
        tracing::debug!(from = %source.display(), to = %destination.display(), "imported asset");
        Ok(destination)
    }

    /// Copy every matching file directly inside `source_dir`
    ///
    /// Returns the imported destinations, sorted by name.
    pub fn import_dir(
        &self,
        kind: AssetKind,
        source_dir: &Path,
        overwrite: bool,
    ) -> Result<Vec<PathBuf>> {
        if !source_dir.is_dir() {
            return Err(LatexlabError::AssetNotFound(source_dir.to_path_buf()));
        }

        let mut sources: Vec<PathBuf> = WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && kind.matches(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        sources.sort();

        if sources.is_empty() {
            tracing::warn!(dir = %source_dir.display(), "no {} files found", kind);
        }

        sources
            .iter()
            .map(|source| self.import_file(kind, source, overwrite))
            .collect()
    }

    /// Files currently stored for `kind`, sorted by name
    pub fn list(&self, kind: AssetKind) -> Result<Vec<AssetEntry>> {
        let dir = self.dir(kind);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| LatexlabError::IoError(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            entries.push(AssetEntry {
                kind,
                name: entry.file_name().to_string_lossy().to_string(),
                size,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Asset paths as seen from `document_dir`, ready for `config.*`
    ///
    /// Paths use forward slashes; the font and image paths end with `/` so
    /// they can go straight into `Path=` and `\graphicspath`.
    pub fn template_variables(&self, document_dir: &Path) -> Map<String, Value> {
        let prefix = relative_prefix(&self.root, document_dir);
        let mut vars = Map::new();
        vars.insert("texmf_path".to_string(), Value::from(format!("{}assets", prefix)));
        vars.insert(
            "fonts_path".to_string(),
            Value::from(format!("{}assets/fonts/", prefix)),
        );
        vars.insert(
            "images_path".to_string(),
            Value::from(format!("{}assets/images/", prefix)),
        );
        vars
    }

    /// Set `config.texmf_path`, `config.fonts_path` and `config.images_path`
    ///
    /// Other keys under `config` are left untouched.
    pub fn inject_paths(&self, variables: &mut Map<String, Value>, document_dir: &Path) {
        let mut context = RenderContext::from_map(std::mem::take(variables));
        for (key, value) in self.template_variables(document_dir) {
            context.insert_path(&format!("config.{}", key), value);
        }
        *variables = context.into_map();
    }
}

/// `../` repeated once per directory between `root` and `document_dir`
///
/// Falls back to an empty prefix when `document_dir` is not inside `root`.
fn relative_prefix(root: &Path, document_dir: &Path) -> String {
    let depth = document_dir
        .strip_prefix(root)
        .map(|rel| {
            rel.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);
    "../".repeat(depth)
}

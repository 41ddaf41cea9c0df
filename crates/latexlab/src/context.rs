//! Global context for CLI commands

use anyhow::Result;
use latexlab_core::compile::LatexEngine;
use latexlab_core::config::{self, LoadedConfig};
use latexlab_core::template::TemplateEngine;
use std::env;
use std::path::PathBuf;

/// Fallback template directory, relative to the working directory
const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Resolved settings shared by the commands
#[allow(dead_code)]
pub struct Context {
    pub work_dir: PathBuf,
    pub template_dir: PathBuf,
    pub project: Option<LoadedConfig>,
    pub verbose: bool,
}

impl Context {
    /// Resolve the template directory and load latexlab.toml if present
    ///
    /// Precedence: `--template-dir` / `LATEXLAB_TEMPLATE_DIR`, then
    /// `[templates] dir` from latexlab.toml, then `./templates`.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is unavailable or
    /// latexlab.toml cannot be parsed.
    pub fn new(template_dir: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let work_dir = env::current_dir()?;
        let project = config::discover(&work_dir)?;

        let template_dir = match (template_dir, &project) {
            (Some(dir), _) => dir,
            (None, Some(loaded)) => loaded.template_dir(),
            (None, None) => work_dir.join(DEFAULT_TEMPLATE_DIR),
        };

        tracing::debug!(
            template_dir = %template_dir.display(),
            config = ?project.as_ref().map(|p| p.path()),
            "resolved context"
        );

        Ok(Self {
            work_dir,
            template_dir,
            project,
            verbose,
        })
    }

    pub fn engine(&self) -> Result<TemplateEngine> {
        Ok(TemplateEngine::new(&self.template_dir)?)
    }

    /// Engine from the command line, else latexlab.toml, else auto
    pub fn latex_engine(&self, requested: Option<LatexEngine>) -> LatexEngine {
        requested
            .or_else(|| self.project.as_ref().map(|p| p.config.compile.engine))
            .unwrap_or_default()
    }

    /// Whether to open the PDF after compiling
    pub fn open_after_compile(&self, requested: bool) -> bool {
        requested
            || self
                .project
                .as_ref()
                .is_some_and(|p| p.config.compile.open)
    }
}

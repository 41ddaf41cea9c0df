//! Running an external LaTeX engine on a rendered document

use crate::error::{LatexlabError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use std::time::Instant;

/// Lines of engine output kept in a failure message
const ERROR_TAIL_LINES: usize = 20;

/// LaTeX engines latexlab knows how to drive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatexEngine {
    /// First engine found on `PATH`, in [`LatexEngine::CANDIDATES`] order
    #[default]
    Auto,
    Tectonic,
    Xelatex,
    Pdflatex,
    Lualatex,
}

impl LatexEngine {
    /// Search order for [`LatexEngine::Auto`]
    pub const CANDIDATES: [LatexEngine; 4] = [
        LatexEngine::Tectonic,
        LatexEngine::Xelatex,
        LatexEngine::Pdflatex,
        LatexEngine::Lualatex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LatexEngine::Auto => "auto",
            LatexEngine::Tectonic => "tectonic",
            LatexEngine::Xelatex => "xelatex",
            LatexEngine::Pdflatex => "pdflatex",
            LatexEngine::Lualatex => "lualatex",
        }
    }

    /// Arguments passed to the engine binary for `file_name`
    fn args(&self, file_name: &OsStr) -> Vec<OsString> {
        match self {
            LatexEngine::Tectonic => vec![file_name.to_os_string()],
            _ => vec![
                OsString::from("-interaction=nonstopmode"),
                file_name.to_os_string(),
            ],
        }
    }
}

impl fmt::Display for LatexEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LatexEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(LatexEngine::Auto),
            "tectonic" => Ok(LatexEngine::Tectonic),
            "xelatex" => Ok(LatexEngine::Xelatex),
            "pdflatex" => Ok(LatexEngine::Pdflatex),
            "lualatex" => Ok(LatexEngine::Lualatex),
            other => Err(format!(
                "unknown engine '{}' (expected auto, tectonic, xelatex, pdflatex or lualatex)",
                other
            )),
        }
    }
}

/// Options for a single compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub tex_file: PathBuf,
    pub engine: LatexEngine,
    /// Directories searched for the engine; `None` uses `PATH`
    pub search_path: Option<OsString>,
}

impl CompileOptions {
    pub fn new(tex_file: impl Into<PathBuf>, engine: LatexEngine) -> Self {
        Self {
            tex_file: tex_file.into(),
            engine,
            search_path: None,
        }
    }
}

/// Outcome of a successful compilation
#[derive(Debug, Clone, Serialize)]
pub struct CompileResult {
    /// Concrete engine that ran (never `auto`)
    pub engine: LatexEngine,
    pub pdf_path: PathBuf,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// Find the binary for `engine`
///
/// `Auto` picks the first candidate present; it does not fall back to the
/// next engine if the chosen one later fails.
pub fn resolve_engine(
    engine: LatexEngine,
    search_path: Option<&OsStr>,
) -> Result<(LatexEngine, PathBuf)> {
    let cwd = std::env::current_dir()?;
    let lookup = |candidate: LatexEngine| match search_path {
        Some(paths) => which::which_in(candidate.as_str(), Some(paths), &cwd),
        None => which::which(candidate.as_str()),
    };

    if engine != LatexEngine::Auto {
        return lookup(engine)
            .map(|path| (engine, path))
            .map_err(|_| LatexlabError::CompilationFailed {
                engine: engine.to_string(),
                reason: format!("'{}' not found on PATH", engine),
            });
    }

    for candidate in LatexEngine::CANDIDATES {
        if let Ok(path) = lookup(candidate) {
            tracing::debug!(engine = %candidate, path = %path.display(), "auto-selected engine");
            return Ok((candidate, path));
        }
    }

    Err(LatexlabError::CompilationFailed {
        engine: engine.to_string(),
        reason: "no LaTeX engine found on PATH (tried tectonic, xelatex, pdflatex, lualatex)"
            .to_string(),
    })
}

/// Compile `options.tex_file` inside its own directory
pub fn compile(options: &CompileOptions) -> Result<CompileResult> {
    let tex_file = &options.tex_file;
    if !tex_file.is_file() {
        return Err(LatexlabError::CompilationFailed {
            engine: options.engine.to_string(),
            reason: format!("input file '{}' not found", tex_file.display()),
        });
    }

    let (engine, binary) = resolve_engine(options.engine, options.search_path.as_deref())?;

    let work_dir = match tex_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = tex_file
        .file_name()
        .ok_or_else(|| LatexlabError::CompilationFailed {
            engine: engine.to_string(),
            reason: format!("'{}' is not a file path", tex_file.display()),
        })?;

    tracing::info!(
        engine = %engine,
        file = %tex_file.display(),
        "running LaTeX engine"
    );

    let start = Instant::now();
    let output = Command::new(&binary)
        .args(engine.args(file_name))
        .current_dir(&work_dir)
        .output()
        .map_err(|e| LatexlabError::CompilationFailed {
            engine: engine.to_string(),
            reason: format!("failed to execute {}: {}", binary.display(), e),
        })?;
    let duration_ms = start.elapsed().as_millis() as u64;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    if !output.status.success() {
        return Err(LatexlabError::CompilationFailed {
            engine: engine.to_string(),
            reason: format!(
                "exited with status {}\n{}",
                exit_code,
                tail(if stderr.trim().is_empty() { &stdout } else { &stderr })
            ),
        });
    }

    let pdf_path = work_dir.join(Path::new(file_name).with_extension("pdf"));
    if !pdf_path.is_file() {
        return Err(LatexlabError::CompilationFailed {
            engine: engine.to_string(),
            reason: format!("no PDF produced at {}", pdf_path.display()),
        });
    }

    tracing::debug!(engine = %engine, duration_ms, "compilation finished");
    Ok(CompileResult {
        engine,
        pdf_path,
        exit_code,
        stdout,
        stderr,
        duration_ms,
    })
}

/// Open a file with the platform's default viewer
pub fn open_pdf(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };

    command.arg(path).spawn()?;
    Ok(())
}

fn tail(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join("\n")
}

//! Compile command - run a LaTeX engine on a .tex file

use crate::context::Context;
use anyhow::Result;
use colored::Colorize;
use latexlab_core::compile::{CompileOptions, CompileResult, LatexEngine, compile, open_pdf};
use std::path::{Path, PathBuf};

pub fn run(path: PathBuf, engine: Option<LatexEngine>, open: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(None, verbose)?;
    compile_and_report(
        &path,
        ctx.latex_engine(engine),
        ctx.open_after_compile(open),
        verbose,
    )?;
    Ok(())
}

/// Compile `tex_file`, print the outcome and optionally open the PDF
pub fn compile_and_report(
    tex_file: &Path,
    engine: LatexEngine,
    open: bool,
    verbose: bool,
) -> Result<CompileResult> {
    if verbose {
        println!(
            "{} Compiling {} with {}",
            "→".cyan(),
            tex_file.display(),
            engine
        );
    }

    let result = match compile(&CompileOptions::new(tex_file, engine)) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} Compilation failed", "✗".red().bold());
            return Err(e.into());
        }
    };

    if verbose && !result.stdout.is_empty() {
        println!("{}", result.stdout.trim_end().dimmed());
    }

    println!(
        "{} Compiled {} with {} ({}ms)",
        "✓".green().bold(),
        result.pdf_path.display(),
        result.engine,
        result.duration_ms
    );

    if open {
        open_pdf(&result.pdf_path)?;
        println!("{} Opened {}", "→".cyan(), result.pdf_path.display());
    }

    Ok(result)
}

//! Generate command - render a template to a .tex file

use crate::cli::TemplateDirArg;
use crate::commands::compile::compile_and_report;
use crate::context::Context;
use anyhow::Result;
use colored::Colorize;
use latexlab_core::compile::LatexEngine;
use latexlab_core::variables::load_variables;
use serde_json::Map;
use std::path::PathBuf;

/// Options for `latexlab generate`
pub struct GenerateOptions {
    pub name: String,
    pub output: PathBuf,
    pub dir: TemplateDirArg,
    pub variables: Option<PathBuf>,
    pub force: bool,
    pub compile: bool,
    pub engine: Option<LatexEngine>,
}

/// Render a template with variables from a file and write it to `output`
///
/// With `compile`, the written document is compiled afterwards.
pub fn run(options: GenerateOptions, verbose: bool) -> Result<()> {
    let ctx = Context::new(options.dir.template_dir, verbose)?;
    let engine = ctx.engine()?;

    let variables = match &options.variables {
        Some(path) => {
            if verbose {
                println!("{} Loading variables from {}", "→".cyan(), path.display());
            }
            load_variables(path)?
        }
        None => Map::new(),
    };

    if verbose {
        println!(
            "{} Rendering '{}' from {}",
            "→".cyan(),
            options.name,
            engine.template_dir().display()
        );
    }

    engine.generate_document(
        &options.name,
        &variables,
        Some(&options.output),
        options.force,
    )?;

    println!(
        "{} Generated {} from template '{}'",
        "✓".green().bold(),
        options.output.display(),
        options.name
    );

    if options.compile {
        compile_and_report(
            &options.output,
            ctx.latex_engine(options.engine),
            ctx.open_after_compile(false),
            verbose,
        )?;
    }

    Ok(())
}

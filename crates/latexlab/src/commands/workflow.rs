//! uccs-workflow command - project setup, assets, render and compile in one go

use crate::cli::TemplateDirArg;
use crate::commands::compile::compile_and_report;
use crate::commands::interactive::collect_variables;
use crate::context::Context;
use crate::prompt::Prompter;
use anyhow::Result;
use colored::Colorize;
use latexlab_core::assets::AssetKind;
use latexlab_core::compile::LatexEngine;
use latexlab_core::scaffold::ProjectLayout;
use latexlab_core::variables::load_variables;
use std::io;
use std::path::PathBuf;

/// Options for `latexlab uccs-workflow`
pub struct WorkflowOptions {
    pub dir: TemplateDirArg,
    pub template: String,
    pub variables: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
    pub fonts: Option<PathBuf>,
    pub images: Option<PathBuf>,
    pub engine: Option<LatexEngine>,
    pub no_compile: bool,
    pub force: bool,
}

pub fn run(options: WorkflowOptions, verbose: bool) -> Result<()> {
    let ctx = Context::new(options.dir.template_dir, verbose)?;
    let engine = ctx.engine()?;
    let template = engine.load_template(&options.template)?;

    let root = match options.project_dir {
        Some(dir) if dir.is_relative() => ctx.work_dir.join(dir),
        Some(dir) => dir,
        None => ctx.work_dir.clone(),
    };
    let layout = ProjectLayout::create(root)?;
    println!(
        "{} Project folder ready at {}",
        "✓".green().bold(),
        layout.root().display()
    );

    for (kind, source) in [
        (AssetKind::Font, &options.fonts),
        (AssetKind::Image, &options.images),
    ] {
        let Some(source) = source else { continue };
        let imported = layout.assets().import_dir(kind, source, options.force)?;
        println!(
            "{} Imported {} {}(s) from {}",
            "✓".green().bold(),
            imported.len(),
            kind,
            source.display()
        );
    }

    let mut variables = match &options.variables {
        Some(path) => {
            if verbose {
                println!("{} Loading variables from {}", "→".cyan(), path.display());
            }
            load_variables(path)?
        }
        None => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout().lock());
            collect_variables(&mut prompter, &template)?
        }
    };

    let output = layout.output_file(&options.template);
    layout
        .assets()
        .inject_paths(&mut variables, &layout.output_dir());

    engine.generate_document(&options.template, &variables, Some(&output), options.force)?;
    println!(
        "{} Generated {} from template '{}'",
        "✓".green().bold(),
        output.display(),
        options.template
    );

    if options.no_compile {
        return Ok(());
    }

    compile_and_report(
        &output,
        ctx.latex_engine(options.engine),
        ctx.open_after_compile(false),
        verbose,
    )?;
    Ok(())
}

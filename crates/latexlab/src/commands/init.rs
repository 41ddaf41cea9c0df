//! Init command - create a template directory with example templates

use crate::cli::TemplateDirArg;
use crate::context::Context;
use anyhow::Result;
use colored::Colorize;
use latexlab_core::config::{CONFIG_FILE, ProjectConfig};
use latexlab_core::scaffold::init_template_dir;

/// Write the builtin templates and, when missing, a latexlab.toml
///
/// latexlab.toml is written to the working directory and points at the
/// chosen template directory.
pub fn run(dir: TemplateDirArg, force: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(dir.template_dir, verbose)?;
    let template_dir = ctx.template_dir.clone();

    let report = init_template_dir(&template_dir, force)?;

    for path in &report.created {
        println!("{} Created {}", "✓".green().bold(), path.display());
    }
    for path in &report.skipped {
        println!(
            "{} Kept existing {} (use --force to replace)",
            "!".yellow(),
            path.display()
        );
    }

    if ctx.project.is_none() {
        let mut config = ProjectConfig::default();
        config.templates.dir = template_dir
            .strip_prefix(&ctx.work_dir)
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| template_dir.clone());
        let config_path = ctx.work_dir.join(CONFIG_FILE);
        config.to_file(&config_path)?;
        println!("{} Created {}", "✓".green().bold(), config_path.display());
    } else if verbose {
        println!("{} Using existing {}", "→".cyan(), CONFIG_FILE);
    }

    println!(
        "\n{} Initialized template directory: {}",
        "✓".green().bold(),
        template_dir.display()
    );
    println!("\n{} Next steps:", "→".cyan());
    println!("  latexlab list-templates");
    println!("  latexlab info example");

    Ok(())
}

//! List-templates command

use crate::cli::TemplateDirArg;
use crate::context::Context;
use crate::output::print_json;
use anyhow::Result;
use colored::Colorize;
use latexlab_core::TemplateEngine;
use serde_json::json;

/// List every template in the template directory
///
/// # Arguments
///
/// * `dir` - Template directory override
/// * `json` - Output as JSON if true
/// * `verbose` - Enable verbose output if true
pub fn run(dir: TemplateDirArg, json: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(dir.template_dir, verbose)?;
    let engine = ctx.engine()?;
    let names = engine.list_templates();

    if json {
        output_json(&engine, &names)
    } else {
        output_human(&engine, &names, verbose);
        Ok(())
    }
}

fn output_json(engine: &TemplateEngine, names: &[String]) -> Result<()> {
    let templates: Vec<_> = names
        .iter()
        .map(|name| match engine.load_template(name) {
            Ok(t) => json!({
                "name": name,
                "description": t.description(),
                "document_type": t.config().document_type,
                "tags": t.config().tags,
            }),
            Err(e) => json!({
                "name": name,
                "error": e.to_string(),
            }),
        })
        .collect();

    print_json(&json!({
        "template_dir": engine.template_dir().display().to_string(),
        "templates": templates,
        "count": names.len(),
    }))
}

fn output_human(engine: &TemplateEngine, names: &[String], verbose: bool) {
    if names.is_empty() {
        println!(
            "{} No templates found in {}",
            "!".yellow(),
            engine.template_dir().display()
        );
        println!("\n{} Create example templates:", "→".cyan());
        println!("  latexlab init");
        return;
    }

    println!(
        "{} Templates in {}:",
        "→".cyan(),
        engine.template_dir().display()
    );
    println!();

    for name in names {
        match engine.load_template(name) {
            Ok(template) => {
                println!("  {} {}", "•".cyan(), name.bold());
                println!("    {}", template.description().dimmed());
                if verbose && !template.config().tags.is_empty() {
                    println!("    tags: {}", template.config().tags.join(", "));
                }
            }
            Err(e) => {
                println!("  {} {}", "✗".red(), name.bold());
                println!("    {}", e.to_string().red());
            }
        }
    }

    println!();
    println!("Total: {} template(s)", names.len());
}

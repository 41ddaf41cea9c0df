//! Info command - show a template's metadata and fields

use crate::cli::TemplateDirArg;
use crate::context::Context;
use crate::output::print_json;
use crate::prompt::display_value;
use anyhow::Result;
use colored::Colorize;
use latexlab_core::Template;
use serde_json::json;

pub fn run(name: String, dir: TemplateDirArg, json: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(dir.template_dir, verbose)?;
    let template = ctx.engine()?.load_template(&name)?;

    if json {
        let config = template.config();
        print_json(&json!({
            "name": template.name(),
            "path": template.path().display().to_string(),
            "description": config.description,
            "document_type": config.document_type,
            "author": config.author,
            "version": config.version,
            "document_class": config.document_class,
            "class_options": config.class_options,
            "packages": config.packages,
            "tags": config.tags,
            "fields": config.fields,
            "required": template.required_variables(),
        }))
    } else {
        output_human(&template);
        Ok(())
    }
}

fn output_human(template: &Template) {
    let config = template.config();

    println!("{} {}", "→".cyan(), template.name().bold());
    println!("  {}", config.description);
    println!();
    println!("  Type:     {}", config.document_type);
    println!("  Version:  {}", config.version);
    if let Some(author) = &config.author {
        println!("  Author:   {}", author);
    }
    if config.class_options.is_empty() {
        println!("  Class:    {}", config.document_class);
    } else {
        println!(
            "  Class:    {} [{}]",
            config.document_class,
            config.class_options.join(",")
        );
    }
    if !config.packages.is_empty() {
        println!("  Packages: {}", config.packages.join(", "));
    }
    if !config.tags.is_empty() {
        println!("  Tags:     {}", config.tags.join(", "));
    }

    println!();
    if config.fields.is_empty() {
        println!("{} No fields declared", "!".yellow());
        return;
    }

    println!("{} Fields:", "→".cyan());
    for field in &config.fields {
        let marker = if field.needs_value() {
            "*".red().bold()
        } else {
            " ".normal()
        };
        let mut line = format!("  {} {} ({})", marker, field.name.bold(), field.field_type);
        line.push_str(&format!(" - {}", field.label));
        if let Some(default) = &field.default {
            line.push_str(&format!(" [default: {}]", display_value(default)));
        }
        if let Some(choices) = &field.choices {
            line.push_str(&format!(" {{{}}}", choices.join(", ")));
        }
        match (field.min_value, field.max_value) {
            (Some(min), Some(max)) => line.push_str(&format!(" range {}..={}", min, max)),
            (Some(min), None) => line.push_str(&format!(" min {}", min)),
            (None, Some(max)) => line.push_str(&format!(" max {}", max)),
            (None, None) => {}
        }
        println!("{}", line);
        if let Some(description) = &field.description {
            println!("      {}", description.dimmed());
        }
    }
    println!();
    println!("  {} = must be provided", "*".red().bold());
}

//! Interactive command - guided document creation

use crate::cli::TemplateDirArg;
use crate::context::Context;
use crate::prompt::{Prompter, describe_error, display_value, is_input_closed};
use anyhow::Result;
use colored::Colorize;
use latexlab_core::assets::{AssetKind, AssetStore};
use latexlab_core::compile::{CompileOptions, LatexEngine, compile, open_pdf};
use latexlab_core::output::write_document;
use latexlab_core::path::slugify;
use latexlab_core::validate::{RenderContext, resolve_context};
use latexlab_core::{Template, TemplateEngine};
use serde_json::{Map, Value, json};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Template whose problems are collected one by one
const HOMEWORK_TEMPLATE: &str = "homework";
const DEFAULT_PROBLEM_COUNT: i64 = 4;
const PREVIEW_WIDTH: usize = 60;

const MENU: [&str; 4] = [
    "Create a new document",
    "Set up assets (fonts, images)",
    "List assets",
    "Exit",
];

pub fn run(dir: TemplateDirArg, verbose: bool) -> Result<()> {
    let ctx = Context::new(dir.template_dir, verbose)?;
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut session = Session::new(
        ctx.engine()?,
        ctx.work_dir.clone(),
        ctx.latex_engine(None),
        Prompter::new(stdin.lock(), stdout.lock()),
    );
    session.run()
}

/// One interactive run over a template directory
pub struct Session<R, W> {
    engine: TemplateEngine,
    work_dir: PathBuf,
    latex_engine: LatexEngine,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        engine: TemplateEngine,
        work_dir: PathBuf,
        latex_engine: LatexEngine,
        prompter: Prompter<R, W>,
    ) -> Self {
        Self {
            engine,
            work_dir,
            latex_engine,
            prompter,
        }
    }

    /// Menu loop; returns when the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        self.prompter
            .say(format!("{}", "latexlab interactive".bold()))?;
        let options: Vec<String> = MENU.iter().map(|s| s.to_string()).collect();

        loop {
            self.prompter.say("")?;
            let choice = match self.prompter.select("What would you like to do?", &options) {
                Ok(choice) => choice,
                Err(e) if is_input_closed(&e) => return Ok(()),
                Err(e) => return Err(e),
            };

            let outcome = match choice {
                0 => self.create_document(),
                1 => self.setup_assets(),
                2 => self.list_assets(),
                _ => {
                    self.prompter.say("Goodbye!")?;
                    return Ok(());
                }
            };

            if let Err(e) = outcome {
                if is_input_closed(&e) {
                    return Ok(());
                }
                tracing::debug!(error = %e, "interactive step failed");
                self.prompter
                    .say(format!("{} {}", "✗".red().bold(), describe_error(&e)))?;
            }
        }
    }

    fn create_document(&mut self) -> Result<()> {
        let names = self.engine.list_templates();
        if names.is_empty() {
            self.prompter.say(format!(
                "{} No templates found in {}",
                "!".yellow(),
                self.engine.template_dir().display()
            ))?;
            self.prompter
                .say(format!("{} Run `latexlab init` first", "→".cyan()))?;
            return Ok(());
        }

        let index = self.prompter.select("Choose a template:", &names)?;
        let template = self.engine.load_template(&names[index])?;
        self.prompter.say(format!(
            "{} {}: {}",
            "→".cyan(),
            template.name().bold(),
            template.description()
        ))?;

        let values = collect_variables(&mut self.prompter, &template)?;
        let context = resolve_context(template.config(), &values)?;
        self.preview(&template, &context)?;

        if !self.prompter.confirm("Generate the document?", true)? {
            self.prompter.say(format!("{} Cancelled", "!".yellow()))?;
            return Ok(());
        }

        let title = context
            .lookup_path("title")
            .and_then(Value::as_str)
            .unwrap_or(template.name());
        let default_name = format!("{}.tex", slugify(title));
        let output = self.choose_output(&default_name)?;

        let rendered = self.engine.render_context(&template, &context)?;
        write_document(&output, &rendered, true)?;
        self.prompter.say(format!(
            "{} Generated {}",
            "✓".green().bold(),
            output.display()
        ))?;

        if self.prompter.confirm("Compile to PDF?", false)? {
            self.compile(&output)?;
        }
        Ok(())
    }

    fn preview(&mut self, template: &Template, context: &RenderContext) -> Result<()> {
        self.prompter.say("")?;
        self.prompter.say(format!("{} Preview:", "→".cyan()))?;
        for field in template.fields() {
            let shown = match context.lookup_path(&field.name) {
                Some(Value::Array(items)) => format!("{} item(s)", items.len()),
                Some(value) => truncate(&display_value(value)),
                None => "(empty)".dimmed().to_string(),
            };
            self.prompter
                .say(format!("  {:<24} {}", field.label, shown))?;
        }
        Ok(())
    }

    /// Ask for the output path until it is new or the user allows overwriting
    fn choose_output(&mut self, default_name: &str) -> Result<PathBuf> {
        let mut suggestion = Some(default_name.to_string());
        loop {
            let answer = self.prompter.ask("Output file", suggestion.as_deref())?;
            if answer.is_empty() {
                continue;
            }

            let path = resolve_output(&self.work_dir, &answer);
            if !path.exists() {
                return Ok(path);
            }

            let question = format!("{} already exists. Overwrite?", path.display());
            if self.prompter.confirm(&question, false)? {
                return Ok(path);
            }
            suggestion = None;
        }
    }

    fn compile(&mut self, tex_file: &Path) -> Result<()> {
        match compile(&CompileOptions::new(tex_file, self.latex_engine)) {
            Ok(result) => {
                self.prompter.say(format!(
                    "{} Compiled {} with {}",
                    "✓".green().bold(),
                    result.pdf_path.display(),
                    result.engine
                ))?;
                if self.prompter.confirm("Open the PDF?", false)? {
                    open_pdf(&result.pdf_path)?;
                }
            }
            Err(e) => {
                self.prompter
                    .say(format!("{} {}", "✗".red().bold(), e))?;
            }
        }
        Ok(())
    }

    fn setup_assets(&mut self) -> Result<()> {
        let store = AssetStore::new(&self.work_dir);
        store.ensure_dirs()?;

        for kind in [AssetKind::Font, AssetKind::Image] {
            let question = format!("Directory or file with {}s (empty to skip)", kind);
            let answer = self.prompter.ask(&question, None)?;
            if answer.is_empty() {
                continue;
            }

            let source = resolve_path(&self.work_dir, &answer);
            let imported = if source.is_dir() {
                store.import_dir(kind, &source, false)
            } else {
                store.import_file(kind, &source, false).map(|p| vec![p])
            };

            match imported {
                Ok(paths) => self.prompter.say(format!(
                    "{} Imported {} {}(s) into {}",
                    "✓".green().bold(),
                    paths.len(),
                    kind,
                    store.dir(kind).display()
                ))?,
                Err(e) => self
                    .prompter
                    .say(format!("{} {}", "✗".red().bold(), e))?,
            }
        }
        Ok(())
    }

    fn list_assets(&mut self) -> Result<()> {
        let store = AssetStore::new(&self.work_dir);
        let mut found = false;

        for kind in [AssetKind::Font, AssetKind::Image] {
            let entries = store.list(kind)?;
            if entries.is_empty() {
                continue;
            }
            found = true;
            self.prompter
                .say(format!("{} {}s:", "→".cyan(), kind))?;
            for entry in entries {
                self.prompter.say(format!(
                    "  {} {} ({:.1} KB)",
                    "•".cyan(),
                    entry.name,
                    entry.size as f64 / 1024.0
                ))?;
            }
        }

        if !found {
            self.prompter.say(format!(
                "{} No assets found. Use 'Set up assets' to import fonts and images.",
                "!".yellow()
            ))?;
        }
        Ok(())
    }
}

/// Prompt for every field of `template`
///
/// Dotted field names produce nested values. The homework template also
/// asks for each problem's title and description.
pub fn collect_variables<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    template: &Template,
) -> Result<Map<String, Value>> {
    let collects_problems = template.name() == HOMEWORK_TEMPLATE;
    let mut values = RenderContext::new();

    for field in template.fields() {
        if collects_problems && field.name == "problems" {
            continue;
        }
        if let Some(value) = prompter.field_value(field)? {
            values.insert_path(&field.name, value);
        }
    }

    if collects_problems {
        let count = values
            .lookup_path("num_problems")
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_PROBLEM_COUNT);
        let problems = collect_problems(prompter, count)?;
        values.insert_path("problems", Value::Array(problems));
    }

    Ok(values.into_map())
}

fn collect_problems<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    count: i64,
) -> Result<Vec<Value>> {
    prompter.say(format!("\n{} Problem details ({})", "→".cyan(), count))?;

    let mut problems = Vec::new();
    for i in 1..=count {
        let title = prompter.ask(
            &format!("Title for Problem {}", i),
            Some(&format!("Problem {}", i)),
        )?;
        let description = prompter.ask(
            &format!("Description for Problem {}", i),
            Some(&format!("Problem {} description goes here.", i)),
        )?;
        problems.push(json!({"title": title, "description": description}));
    }
    Ok(problems)
}

/// Relative answers are taken from the working directory
fn resolve_path(work_dir: &Path, answer: &str) -> PathBuf {
    let path = PathBuf::from(answer);
    if path.is_relative() {
        work_dir.join(path)
    } else {
        path
    }
}

/// Like [`resolve_path`], adding `.tex` when the name has no extension
fn resolve_output(work_dir: &Path, answer: &str) -> PathBuf {
    let mut path = resolve_path(work_dir, answer);
    if path.extension().is_none() {
        path.set_extension("tex");
    }
    path
}

fn truncate(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    let multi = text.lines().nth(1).is_some();
    if first_line.chars().count() > PREVIEW_WIDTH {
        let cut: String = first_line.chars().take(PREVIEW_WIDTH).collect();
        format!("{}…", cut)
    } else if multi {
        format!("{}…", first_line)
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latexlab_testkit::fixtures::write_fixture_templates;
    use latexlab_testkit::temp_dir_in_workspace;
    use std::io::Cursor;

    fn session(dir: &Path, input: &str) -> Session<Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(
            TemplateEngine::new(dir.join("templates")).unwrap(),
            dir.to_path_buf(),
            LatexEngine::Auto,
            Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()),
        )
    }

    fn output_of(session: Session<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(session.prompter.into_output()).unwrap()
    }

    #[test]
    fn test_exit_immediately() {
        let temp = temp_dir_in_workspace();
        let mut s = session(temp.path(), "4\n");
        s.run().unwrap();
        assert!(output_of(s).contains("Goodbye!"));
    }

    #[test]
    fn test_closed_input_ends_session() {
        let temp = temp_dir_in_workspace();
        let mut s = session(temp.path(), "");
        s.run().unwrap();
    }

    #[test]
    fn test_create_without_templates() {
        let temp = temp_dir_in_workspace();
        let mut s = session(temp.path(), "1\n4\n");
        s.run().unwrap();
        assert!(output_of(s).contains("No templates found"));
    }

    #[test]
    fn test_create_document_flow() {
        let temp = temp_dir_in_workspace();
        write_fixture_templates(&temp.path().join("templates"));

        // menu 1, template 1 (report), title, pages (bad then ok), font size by
        // number, abstract, generate, default name, no compile, exit
        let input = "1\n1\nLab One\n99\n12\n3\nShort.\n.\n\n\nn\n4\n";
        let mut s = session(temp.path(), input);
        s.run().unwrap();

        let doc = std::fs::read_to_string(temp.path().join("lab_one.tex")).unwrap();
        assert!(doc.contains("\\documentclass[12pt]{article}"));
        assert!(doc.contains("% pages: 12"));
        assert!(doc.contains("Short."));

        let out = output_of(s);
        assert!(out.contains("OUT_OF_RANGE"));
        assert!(out.contains("Generated"));
    }

    #[test]
    fn test_existing_output_asks_for_new_name() {
        let temp = temp_dir_in_workspace();
        write_fixture_templates(&temp.path().join("templates"));
        std::fs::write(temp.path().join("notes.tex"), "keep").unwrap();

        // template 2 (simple), title, generate, keep default, refuse overwrite,
        // new name, no compile, exit
        let input = "1\n2\nNotes\n\n\nn\nnotes-v2.tex\nn\n4\n";
        let mut s = session(temp.path(), input);
        s.run().unwrap();

        assert_eq!(
            std::fs::read_to_string(temp.path().join("notes.tex")).unwrap(),
            "keep"
        );
        let doc = std::fs::read_to_string(temp.path().join("notes-v2.tex")).unwrap();
        assert!(doc.contains("\\title{Notes}"));
    }

    #[test]
    fn test_assets_setup_and_listing() {
        let temp = temp_dir_in_workspace();
        let fonts = temp.path().join("incoming");
        std::fs::create_dir_all(&fonts).unwrap();
        std::fs::write(fonts.join("Fira.otf"), vec![0u8; 2048]).unwrap();

        let input = "2\nincoming\n\n3\n4\n";
        let mut s = session(temp.path(), input);
        s.run().unwrap();

        assert!(temp.path().join("assets/fonts/Fira.otf").is_file());
        let out = output_of(s);
        assert!(out.contains("Imported 1 font(s)"));
        assert!(out.contains("Fira.otf (2.0 KB)"));
    }

    #[test]
    fn test_homework_collects_problems() {
        let temp = temp_dir_in_workspace();
        let dir = temp.path().join("templates");
        latexlab_core::scaffold::init_template_dir(&dir, false).unwrap();
        let engine = TemplateEngine::new(&dir).unwrap();
        let template = engine.load_template("homework").unwrap();

        // title, student name, student id, course id, course name, due date,
        // num_problems, then two problems
        let input = "\nAda\n\nCS 3160\n\n2024-09-01\n2\nGraphs\nColor it.\n\n\n";
        let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let values = collect_variables(&mut prompter, &template).unwrap();

        assert_eq!(values["title"], json!("Homework 1"));
        assert_eq!(values["student"], json!({"name": "Ada"}));
        assert_eq!(values["due_date"], json!("2024-09-01"));
        assert_eq!(
            values["problems"],
            json!([
                {"title": "Graphs", "description": "Color it."},
                {"title": "Problem 2", "description": "Problem 2 description goes here."}
            ])
        );
    }

    #[test]
    fn test_resolve_output_adds_extension() {
        let dir = Path::new("/work");
        assert_eq!(resolve_output(dir, "report"), PathBuf::from("/work/report.tex"));
        assert_eq!(resolve_output(dir, "/tmp/a.tex"), PathBuf::from("/tmp/a.tex"));
        assert_eq!(resolve_path(dir, "fonts"), PathBuf::from("/work/fonts"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short"), "short");
        assert_eq!(truncate("one\ntwo"), "one…");
        assert_eq!(truncate(&"x".repeat(70)).chars().count(), PREVIEW_WIDTH + 1);
    }
}

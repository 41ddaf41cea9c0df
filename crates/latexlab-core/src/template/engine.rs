//! Template engine backed by minijinja
//!
//! LaTeX uses `{`, `}` and `%` heavily, so the Jinja delimiters are replaced:
//!
//! | purpose    | delimiters  |
//! |------------|-------------|
//! | expression | `<< x >>`   |
//! | block      | `<% if %>`  |
//! | comment    | `<# note #>`|

use crate::error::{LatexlabError, Result};
use crate::output::write_document;
use crate::path::validate_name;
use crate::template::schema::TemplateConfig;
use crate::template::wrapper::Template;
use crate::template::{CONFIG_EXTENSION, TEMPLATE_EXTENSION};
use crate::validate::{resolve_context, RenderContext};
use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Renders templates found in one template directory
pub struct TemplateEngine {
    template_dir: PathBuf,
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Build an engine rooted at `template_dir`
    ///
    /// `<% include %>` and `<% extends %>` resolve against the same directory.
    pub fn new(template_dir: impl Into<PathBuf>) -> Result<Self> {
        let template_dir = template_dir.into();

        let syntax = SyntaxConfig::builder()
            .block_delimiters("<%", "%>")
            .variable_delimiters("<<", ">>")
            .comment_delimiters("<#", "#>")
            .build()
            .map_err(|e| LatexlabError::TemplateSyntax {
                template: "<environment>".to_string(),
                reason: e.to_string(),
            })?;

        let mut env = Environment::new();
        env.set_syntax(syntax);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.set_loader(minijinja::path_loader(&template_dir));

        Ok(Self { template_dir, env })
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Names of all `*.tex.j2` files directly inside the template directory, sorted
    ///
    /// A missing directory yields an empty list.
    pub fn list_templates(&self) -> Vec<String> {
        if !self.template_dir.is_dir() {
            return Vec::new();
        }

        let mut names: Vec<String> = WalkDir::new(&self.template_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_str()?.to_string();
                let stem = file_name.strip_suffix(TEMPLATE_EXTENSION)?;
                (!stem.is_empty()).then(|| stem.to_string())
            })
            .collect();

        names.sort();
        names
    }

    /// Paths of the template source and config for `name`
    pub fn template_paths(&self, name: &str) -> (PathBuf, PathBuf) {
        (
            self.template_dir
                .join(format!("{}{}", name, TEMPLATE_EXTENSION)),
            self.template_dir.join(format!("{}{}", name, CONFIG_EXTENSION)),
        )
    }

    /// Load the `<name>.tex.j2` / `<name>.yaml` pair
    ///
    /// The source is parsed immediately so syntax errors surface before
    /// any rendering.
    pub fn load_template(&self, name: &str) -> Result<Template> {
        let (template_path, config_path) = self.template_paths(name);

        if validate_name(name).is_err() {
            return Err(LatexlabError::TemplateNotFound {
                name: name.to_string(),
                path: template_path,
            });
        }
        for path in [&template_path, &config_path] {
            if !path.is_file() {
                return Err(LatexlabError::TemplateNotFound {
                    name: name.to_string(),
                    path: path.clone(),
                });
            }
        }

        let source = std::fs::read_to_string(&template_path)?;
        let config = TemplateConfig::from_file(&config_path)?;
        let template = Template::new(name.to_string(), template_path, source, config);

        // scratch environment: the loader cache must not stand in for the file just read
        let file_name = template.file_name();
        let mut env = self.env.clone();
        env.add_template_owned(file_name.clone(), template.source().to_string())
            .map_err(|e| map_jinja_error(&file_name, e))?;

        tracing::debug!(
            template = name,
            fields = template.fields().len(),
            "loaded template"
        );
        Ok(template)
    }

    /// Validate `variables` against the template's fields and render
    pub fn render(&self, template: &Template, variables: &Map<String, Value>) -> Result<String> {
        let context = resolve_context(template.config(), variables)?;
        self.render_context(template, &context)
    }

    /// Render an already resolved context
    ///
    /// The text held by `template` is what gets rendered; includes and
    /// extends still go through the loader.
    pub fn render_context(&self, template: &Template, context: &RenderContext) -> Result<String> {
        let file_name = template.file_name();
        self.env
            .render_named_str(&file_name, template.source(), context)
            .map_err(|e| map_jinja_error(&file_name, e))
    }

    /// Load, render and optionally write a document
    ///
    /// Returns the rendered text. With `output` set, the text is written
    /// there; an existing file is only replaced when `overwrite` is true.
    pub fn generate_document(
        &self,
        name: &str,
        variables: &Map<String, Value>,
        output: Option<&Path>,
        overwrite: bool,
    ) -> Result<String> {
        let template = self.load_template(name)?;
        let rendered = self.render(&template, variables)?;

        if let Some(path) = output {
            write_document(path, &rendered, overwrite)?;
            tracing::info!(template = name, output = %path.display(), "generated document");
        }

        Ok(rendered)
    }

    /// Write a new template pair into the template directory
    pub fn create_template(
        &self,
        name: &str,
        content: &str,
        config: &TemplateConfig,
    ) -> Result<Template> {
        validate_name(name)?;
        config
            .validate()
            .map_err(|reason| LatexlabError::ConfigMalformed {
                path: self.template_paths(name).1,
                reason,
            })?;

        let (template_path, config_path) = self.template_paths(name);
        std::fs::create_dir_all(&self.template_dir)?;
        std::fs::write(&template_path, content)?;
        std::fs::write(&config_path, config.to_yaml()?)?;

        tracing::info!(template = name, dir = %self.template_dir.display(), "created template");
        self.load_template(name)
    }
}

fn map_jinja_error(template: &str, err: minijinja::Error) -> LatexlabError {
    let mut reason = err.to_string();
    if let Some(detail) = err.detail() {
        if !reason.contains(detail) {
            reason = format!("{} ({})", reason, detail);
        }
    }

    match err.kind() {
        ErrorKind::SyntaxError => LatexlabError::TemplateSyntax {
            template: template.to_string(),
            reason,
        },
        _ => LatexlabError::RenderFailed {
            template: template.to_string(),
            reason,
        },
    }
}

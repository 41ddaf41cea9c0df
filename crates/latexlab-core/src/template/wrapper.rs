use crate::template::schema::{Field, TemplateConfig};
use crate::template::TEMPLATE_EXTENSION;
use crate::validate::RenderContext;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A loaded template: its source text paired with its configuration
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    path: PathBuf,
    source: String,
    config: TemplateConfig,
}

impl Template {
    pub(crate) fn new(name: String, path: PathBuf, source: String, config: TemplateConfig) -> Self {
        Self {
            name,
            path,
            source,
            config,
        }
    }

    /// Template name (file stem without `.tex.j2`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the `.tex.j2` file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as known to the renderer
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, TEMPLATE_EXTENSION)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn description(&self) -> &str {
        &self.config.description
    }

    pub fn fields(&self) -> &[Field] {
        &self.config.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.config.field(name)
    }

    /// Names of fields the user has to fill in (required, no default)
    pub fn required_variables(&self) -> Vec<&str> {
        self.config
            .fields
            .iter()
            .filter(|f| f.needs_value())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Merge `variables` over the declared field defaults
    ///
    /// No validation happens here; use [`crate::validate::resolve_context`]
    /// for the checked context.
    pub fn apply_defaults(&self, variables: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = RenderContext::new();
        for field in &self.config.fields {
            if let Some(default) = &field.default {
                merged.insert_path(&field.name, default.clone());
            }
        }
        merged.deep_merge(variables);
        merged.into_map()
    }
}

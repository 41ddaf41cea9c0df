//! Template configuration schema (`<name>.yaml`)

use crate::error::{LatexlabError, Result};
use crate::validate::coerce_field;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// LaTeX document families a template can produce
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Article,
    Report,
    Book,
    Letter,
    Beamer,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Article => "article",
            DocumentType::Report => "report",
            DocumentType::Book => "book",
            DocumentType::Letter => "letter",
            DocumentType::Beamer => "beamer",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type of a template field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Multiline,
    Integer,
    Float,
    Boolean,
    Date,
    Choice,
    List,
    Dict,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Multiline => "multiline",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Choice => "choice",
            FieldType::List => "list",
            FieldType::Dict => "dict",
        }
    }

    /// Integer and float fields are the only ones that take bounds
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed input slot declared by a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    /// Variable name; dots address nested values (`student.name`)
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Human-readable label used by prompts
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

fn default_required() -> bool {
    true
}

impl Field {
    /// Field with the given name and type; label mirrors the name
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type,
            description: None,
            required: true,
            default: None,
            choices: None,
            min_value: None,
            max_value: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// The user has to provide a value: required and nothing to fall back on
    pub fn needs_value(&self) -> bool {
        self.required && self.default.is_none()
    }

    /// Check the declaration itself, independent of any supplied value
    fn check_definition(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("field name cannot be empty".to_string());
        }

        match (&self.field_type, &self.choices) {
            (FieldType::Choice, None) => {
                return Err(format!("choice field '{}' has no choices", self.name));
            }
            (FieldType::Choice, Some(choices)) if choices.is_empty() => {
                return Err(format!("choice field '{}' has no choices", self.name));
            }
            (FieldType::Choice, Some(_)) | (_, None) => {}
            (other, Some(_)) => {
                return Err(format!(
                    "field '{}' of type {} cannot declare choices",
                    self.name, other
                ));
            }
        }

        if !self.field_type.is_numeric() && (self.min_value.is_some() || self.max_value.is_some())
        {
            return Err(format!(
                "field '{}' of type {} cannot declare min_value/max_value",
                self.name, self.field_type
            ));
        }

        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(format!(
                    "field '{}' has min_value {} greater than max_value {}",
                    self.name, min, max
                ));
            }
        }

        if let Some(default) = &self.default {
            coerce_field(self, default)
                .map_err(|e| format!("default of field '{}' is invalid: {}", self.name, e))?;
        }

        Ok(())
    }
}

/// Optional document section with its own fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub optional: bool,
}

/// `<name>.yaml` schema
///
/// Top-level keys that are not part of the schema are kept in `variables`
/// and become static template variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateConfig {
    pub name: String,
    pub description: String,
    pub document_type: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default = "default_document_class")]
    pub document_class: String,
    #[serde(default)]
    pub class_options: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,

    #[serde(flatten)]
    pub variables: Map<String, Value>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_document_class() -> String {
    "article".to_string()
}

impl TemplateConfig {
    /// Minimal config with no fields
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        document_type: DocumentType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            document_type,
            author: None,
            version: default_version(),
            fields: Vec::new(),
            sections: Vec::new(),
            packages: Vec::new(),
            document_class: document_type_class(document_type),
            class_options: Vec::new(),
            tags: Vec::new(),
            preview_image: None,
            variables: Map::new(),
        }
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        Self::from_yaml_str(&content).map_err(|reason| LatexlabError::ConfigMalformed {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse and validate YAML text; the error is a human-readable reason
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, String> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LatexlabError::ConfigMalformed {
            path: format!("{}.yaml", self.name).into(),
            reason: e.to_string(),
        })
    }

    /// Check every invariant of the schema
    ///
    /// Field names are unique within the config and within each section.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("template name cannot be empty".to_string());
        }

        check_fields(&self.fields)?;
        for section in &self.sections {
            check_fields(&section.fields)
                .map_err(|e| format!("section '{}': {}", section.name, e))?;
        }

        Ok(())
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields flagged `required`, in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.required)
    }
}

fn document_type_class(document_type: DocumentType) -> String {
    document_type.as_str().to_string()
}

fn check_fields(fields: &[Field]) -> std::result::Result<(), String> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(format!("duplicate field name '{}'", field.name));
        }
        field.check_definition()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const REPORT_YAML: &str = r#"
name: report
description: Lab report
document_type: report
author: Physics Dept
fields:
  - name: title
    type: string
    label: Title
  - name: pages
    type: integer
    label: Page count
    required: false
    default: 10
    min_value: 1
    max_value: 50
  - name: size
    type: choice
    label: Font size
    choices: ["10pt", "11pt", "12pt"]
    default: "11pt"
packages: [amsmath, graphicx]
class_options: ["11pt"]
tags: [lab]
university: UCCS
"#;

    #[test]
    fn test_parse_full_config() {
        let config = TemplateConfig::from_yaml_str(REPORT_YAML).unwrap();
        assert_eq!(config.name, "report");
        assert_eq!(config.document_type, DocumentType::Report);
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.document_class, "article");
        assert_eq!(config.fields.len(), 3);
        assert!(config.fields[0].required);
        assert_eq!(config.fields[1].field_type, FieldType::Integer);
        assert_eq!(config.fields[1].default, Some(json!(10)));
        assert_eq!(config.packages, vec!["amsmath", "graphicx"]);
        assert_eq!(config.variables.get("university"), Some(&json!("UCCS")));
    }

    #[test]
    fn test_missing_description_is_rejected() {
        let err = TemplateConfig::from_yaml_str("name: x\ndocument_type: article\n").unwrap_err();
        assert!(err.contains("description"), "{}", err);
    }

    #[test]
    fn test_unknown_field_type_is_rejected() {
        let yaml = r#"
name: x
description: d
document_type: article
fields:
  - name: a
    type: text
    label: A
"#;
        let err = TemplateConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.contains("text"), "{}", err);
    }

    #[test]
    fn test_duplicate_field_names_are_rejected() {
        let mut config = TemplateConfig::new("x", "d", DocumentType::Article);
        config.fields.push(Field::new("title", FieldType::String));
        config.fields.push(Field::new("title", FieldType::Multiline));
        let err = config.validate().unwrap_err();
        assert!(err.contains("duplicate field name 'title'"));
    }

    #[test]
    fn test_choice_without_choices_is_rejected() {
        let mut config = TemplateConfig::new("x", "d", DocumentType::Article);
        config.fields.push(Field::new("size", FieldType::Choice));
        assert!(config.validate().unwrap_err().contains("has no choices"));

        config.fields[0].choices = Some(Vec::new());
        assert!(config.validate().unwrap_err().contains("has no choices"));
    }

    #[test]
    fn test_bounds_on_string_field_are_rejected() {
        let mut config = TemplateConfig::new("x", "d", DocumentType::Article);
        config
            .fields
            .push(Field::new("title", FieldType::String).with_bounds(Some(1.0), None));
        assert!(config.validate().unwrap_err().contains("min_value/max_value"));
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let mut config = TemplateConfig::new("x", "d", DocumentType::Article);
        config
            .fields
            .push(Field::new("n", FieldType::Integer).with_bounds(Some(5.0), Some(1.0)));
        assert!(config.validate().unwrap_err().contains("greater than"));
    }

    #[test]
    fn test_invalid_default_is_rejected() {
        let mut config = TemplateConfig::new("x", "d", DocumentType::Article);
        config.fields.push(
            Field::new("n", FieldType::Integer)
                .with_bounds(Some(1.0), Some(3.0))
                .with_default(json!(7)),
        );
        let err = config.validate().unwrap_err();
        assert!(err.contains("default of field 'n'"), "{}", err);
    }

    #[test]
    fn test_to_yaml_keeps_static_variables() {
        let config = TemplateConfig::from_yaml_str(REPORT_YAML).unwrap();
        let yaml = config.to_yaml().unwrap();
        let reparsed = TemplateConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_required_fields_and_lookup() {
        let config = TemplateConfig::from_yaml_str(REPORT_YAML).unwrap();
        let required: Vec<_> = config.required_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(required, vec!["title", "size"]);
        assert!(config.field("pages").is_some());
        assert!(config.field("missing").is_none());
        assert!(config.field("title").unwrap().needs_value());
        assert!(!config.field("size").unwrap().needs_value());
    }

    #[test]
    fn test_new_uses_document_type_class() {
        let config = TemplateConfig::new("slides", "d", DocumentType::Beamer);
        assert_eq!(config.document_class, "beamer");
    }
}

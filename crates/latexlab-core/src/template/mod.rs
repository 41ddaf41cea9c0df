//! LaTeX templates: configuration schema, loaded templates and rendering
//!
//! A template named `report` is the pair `report.tex.j2` + `report.yaml`
//! inside a template directory.

pub mod engine;
pub mod schema;
mod wrapper;

pub use engine::TemplateEngine;
pub use schema::{DocumentType, Field, FieldType, Section, TemplateConfig};
pub use wrapper::Template;

/// Extension of template source files
pub const TEMPLATE_EXTENSION: &str = ".tex.j2";

/// Extension of template configuration files
pub const CONFIG_EXTENSION: &str = ".yaml";

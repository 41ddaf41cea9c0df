use crate::error::{LatexlabError, Result};
use crate::template::schema::TemplateConfig;
use crate::validate::coerce_field;
use serde::Serialize;
use serde_json::{Map, Value};

/// Resolved variables handed to the template renderer
///
/// Keys may be addressed with dotted paths; `student.name` refers to the
/// `name` key of the `student` mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    values: Map<String, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    /// Look up a value by dotted path
    ///
    /// A literal key containing dots wins over the nested lookup.
    pub fn lookup_path(&self, path: &str) -> Option<&Value> {
        lookup_in(&self.values, path)
    }

    /// Insert a value at a dotted path, creating intermediate mappings
    ///
    /// A non-mapping value sitting on the path is replaced.
    pub fn insert_path(&mut self, path: &str, value: Value) {
        let mut parts: Vec<&str> = path.split('.').collect();
        let Some(last) = parts.pop() else {
            return;
        };

        let mut current = &mut self.values;
        for part in parts {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                return;
            };
            current = next;
        }

        current.insert(last.to_string(), value);
    }

    /// Recursively merge `other` into this context
    ///
    /// Mappings merge key by key; any other value replaces what was there.
    /// Null values are skipped.
    pub fn deep_merge(&mut self, other: &Map<String, Value>) {
        merge_maps(&mut self.values, other);
    }
}

fn lookup_in<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }

    let (head, rest) = path.split_once('.')?;
    match map.get(head)? {
        Value::Object(inner) => lookup_in(inner, rest),
        _ => None,
    }
}

fn merge_maps(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (_, Value::Null) => {}
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_maps(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Build the render context for one generation request
///
/// Precedence from low to high: config metadata (`document_class`,
/// `class_options`, `packages`), static config variables, field defaults,
/// supplied values. Every declared field is validated in declaration order
/// and stored in its coerced form.
pub fn resolve_context(
    config: &TemplateConfig,
    supplied: &Map<String, Value>,
) -> Result<RenderContext> {
    let mut context = RenderContext::new();
    context
        .values
        .insert("document_class".to_string(), Value::from(config.document_class.clone()));
    context
        .values
        .insert("class_options".to_string(), Value::from(config.class_options.clone()));
    context
        .values
        .insert("packages".to_string(), Value::from(config.packages.clone()));

    context.deep_merge(&config.variables);
    context.deep_merge(supplied);

    for field in &config.fields {
        let provided = lookup_in(supplied, &field.name).filter(|v| !v.is_null());

        let value = match (provided, &field.default) {
            (Some(value), _) => value,
            (None, Some(default)) => default,
            (None, None) if field.required => {
                return Err(LatexlabError::MissingRequiredField {
                    field: field.name.clone(),
                });
            }
            (None, None) => continue,
        };

        let coerced = coerce_field(field, value)?;
        context.insert_path(&field.name, coerced);
    }

    tracing::debug!(
        template = %config.name,
        keys = context.values.len(),
        "resolved render context"
    );

    Ok(context)
}

//! Per-field type coercion and bound checks

use crate::error::{LatexlabError, Result};
use crate::template::schema::{Field, FieldType};
use chrono::NaiveDate;
use serde_json::{Number, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coerce a supplied value into the shape declared by `field`
///
/// Numeric results are checked against `min_value`/`max_value` and choice
/// values against the declared choices.
pub fn coerce_field(field: &Field, value: &Value) -> Result<Value> {
    let coerced = match field.field_type {
        FieldType::String | FieldType::Multiline => Value::String(coerce_text(field, value)?),
        FieldType::Integer => {
            let n = coerce_integer(field, value)?;
            check_bounds(field, n as f64, &n.to_string())?;
            Value::from(n)
        }
        FieldType::Float => {
            let n = coerce_float(field, value)?;
            check_bounds(field, n, &format_number(n))?;
            Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| mismatch(field, value))?
        }
        FieldType::Boolean => Value::Bool(coerce_bool(field, value)?),
        FieldType::Date => Value::String(coerce_date(field, value)?),
        FieldType::Choice => Value::String(coerce_choice(field, value)?),
        FieldType::List => match value {
            Value::Array(_) => value.clone(),
            _ => return Err(mismatch(field, value)),
        },
        FieldType::Dict => match value {
            Value::Object(_) => value.clone(),
            _ => return Err(mismatch(field, value)),
        },
    };

    Ok(coerced)
}

/// Short description of a value for error messages
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string '{}'", s),
        Value::Array(items) => format!("list of {} item(s)", items.len()),
        Value::Object(_) => "mapping".to_string(),
    }
}

fn mismatch(field: &Field, value: &Value) -> LatexlabError {
    LatexlabError::TypeMismatch {
        field: field.name.clone(),
        expected: expected_name(field.field_type).to_string(),
        found: describe(value),
    }
}

fn expected_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Date => "date (YYYY-MM-DD or a LaTeX macro such as \\today)",
        FieldType::Dict => "dict",
        other => other.as_str(),
    }
}

fn coerce_text(field: &Field, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(mismatch(field, value)),
    }
}

fn coerce_integer(field: &Field, value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            n.as_f64()
                .and_then(whole_number)
                .ok_or_else(|| mismatch(field, value))
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
                .ok_or_else(|| mismatch(field, value))
        }
        _ => Err(mismatch(field, value)),
    }
}

fn whole_number(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn coerce_float(field: &Field, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| mismatch(field, value))
}

fn coerce_bool(field: &Field, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(mismatch(field, value)),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(mismatch(field, value)),
        },
        _ => Err(mismatch(field, value)),
    }
}

fn coerce_date(field: &Field, value: &Value) -> Result<String> {
    let Value::String(s) = value else {
        return Err(mismatch(field, value));
    };
    let s = s.trim();

    if s.starts_with('\\') {
        return Ok(s.to_string());
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| mismatch(field, value))
}

fn coerce_choice(field: &Field, value: &Value) -> Result<String> {
    let candidate = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err(mismatch(field, value)),
    };

    let choices = field.choices.as_deref().unwrap_or_default();
    if choices.iter().any(|c| *c == candidate) {
        Ok(candidate)
    } else {
        Err(LatexlabError::InvalidChoice {
            field: field.name.clone(),
            value: candidate,
            choices: choices.to_vec(),
        })
    }
}

fn check_bounds(field: &Field, n: f64, shown: &str) -> Result<()> {
    let below = field.min_value.is_some_and(|min| n < min);
    let above = field.max_value.is_some_and(|max| n > max);

    if below || above {
        return Err(LatexlabError::OutOfRange {
            field: field.name.clone(),
            value: shown.to_string(),
            bounds: describe_bounds(field.min_value, field.max_value),
        });
    }
    Ok(())
}

fn describe_bounds(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("[{}, {}]", format_number(min), format_number(max)),
        (Some(min), None) => format!(">= {}", format_number(min)),
        (None, Some(max)) => format!("<= {}", format_number(max)),
        (None, None) => "unbounded".to_string(),
    }
}

fn format_number(n: f64) -> String {
    match whole_number(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

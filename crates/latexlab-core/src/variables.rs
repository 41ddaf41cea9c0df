//! Loading variable files (`--variables`)

use crate::error::{LatexlabError, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Read a YAML (`.yaml`/`.yml`) or JSON (`.json`) variables file
///
/// The document must be a mapping; an empty YAML document yields an empty
/// mapping.
pub fn load_variables(path: &Path) -> Result<Map<String, Value>> {
    let invalid = |reason: String| LatexlabError::VariablesInvalid {
        path: path.to_path_buf(),
        reason,
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;

    let value: Value = match extension.as_deref() {
        Some("yaml") | Some("yml") if content.trim().is_empty() => Value::Null,
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?
        }
        Some("json") => serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        other => {
            return Err(invalid(format!(
                "unsupported file type '{}' (expected .yaml, .yml or .json)",
                other.unwrap_or("")
            )))
        }
    };

    match value {
        Value::Object(map) => {
            tracing::debug!(path = %path.display(), keys = map.len(), "loaded variables");
            Ok(map)
        }
        Value::Null => Ok(Map::new()),
        other => Err(invalid(format!(
            "expected a mapping at the top level, got {}",
            crate::validate::describe(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latexlab_testkit::temp_dir_in_workspace;
    use serde_json::json;

    #[test]
    fn test_load_yaml_nested() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("vars.yml");
        std::fs::write(
            &path,
            "title: HW 2\nstudent:\n  name: Ada\nproblems:\n  - a\n  - b\n",
        )
        .unwrap();

        let vars = load_variables(&path).unwrap();
        assert_eq!(vars["title"], json!("HW 2"));
        assert_eq!(vars["student"], json!({"name": "Ada"}));
        assert_eq!(vars["problems"], json!(["a", "b"]));
    }

    #[test]
    fn test_load_json() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("vars.JSON");
        std::fs::write(&path, r#"{"count": 3, "draft": false}"#).unwrap();

        let vars = load_variables(&path).unwrap();
        assert_eq!(vars["count"], json!(3));
        assert_eq!(vars["draft"], json!(false));
    }

    #[test]
    fn test_empty_yaml_is_empty_mapping() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("vars.yaml");
        std::fs::write(&path, "").unwrap();
        assert!(load_variables(&path).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_mapping_and_unknown_extension() {
        let temp = temp_dir_in_workspace();

        let list = temp.path().join("vars.yaml");
        std::fs::write(&list, "- a\n- b\n").unwrap();
        let err = load_variables(&list).unwrap_err();
        assert!(err.to_string().contains("expected a mapping"), "{}", err);

        let toml = temp.path().join("vars.toml");
        std::fs::write(&toml, "a = 1").unwrap();
        let err = load_variables(&toml).unwrap_err();
        assert!(err.to_string().contains("unsupported file type 'toml'"));
    }

    #[test]
    fn test_missing_file_is_variables_invalid() {
        let temp = temp_dir_in_workspace();
        let err = load_variables(&temp.path().join("none.yaml")).unwrap_err();
        assert!(matches!(err, LatexlabError::VariablesInvalid { .. }));
    }
}

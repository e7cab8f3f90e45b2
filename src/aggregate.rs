//! Aggregation of method and schema fragments.
//!
//! Accumulators are local values returned from each function; nothing is
//! shared across runs.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::BuildError;
use crate::loader::{self, read_file};

/// Concatenate per-file method lists into one ordered sequence.
///
/// Each fragment file must hold a list of method objects. File order follows
/// the loader's pinned listing order; in-file order is preserved.
///
/// # Errors
///
/// Returns `BuildError::UnexpectedShape` if a fragment is not a list, or any
/// loader error.
pub fn collect_methods(dir: &Path) -> Result<Vec<Value>, BuildError> {
    let mut methods = Vec::new();
    for (path, value) in loader::load_dir(dir)? {
        match value {
            Value::Array(list) => methods.extend(list),
            _ => {
                return Err(BuildError::UnexpectedShape {
                    path,
                    expected: "list of methods",
                })
            }
        }
    }
    Ok(methods)
}

/// Merge per-file schema mappings into one registry via repeated shallow
/// merge.
///
/// On duplicate keys the later file wins. That is accepted behavior, not an
/// error; a debug note records the overwrite.
///
/// # Errors
///
/// Returns `BuildError::UnexpectedShape` if a fragment is not a mapping, or
/// any loader error.
pub fn collect_schemas(dir: &Path) -> Result<Map<String, Value>, BuildError> {
    let mut schemas = Map::new();
    for (path, value) in loader::load_dir(dir)? {
        match value {
            Value::Object(map) => {
                for (key, schema) in map {
                    if schemas.contains_key(&key) {
                        log::debug!(
                            "schema {} redefined by {}, later file wins",
                            key,
                            path.display()
                        );
                    }
                    schemas.insert(key, schema);
                }
            }
            _ => {
                return Err(BuildError::UnexpectedShape {
                    path,
                    expected: "mapping of schemas",
                })
            }
        }
    }
    Ok(schemas)
}

/// Overlay free-text descriptions onto methods by file name.
///
/// Each file `<methodName>.<ext>` in the directory replaces the
/// `description` of every method whose name matches the stem
/// case-insensitively. Files matching no method are ignored with a debug
/// note.
///
/// # Errors
///
/// Returns loader IO errors; unmatched files are never an error.
pub fn overlay_descriptions(methods: &mut [Value], dir: &Path) -> Result<(), BuildError> {
    for path in loader::list_dir(dir)? {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = read_file(&path)?;

        let mut matched = false;
        for method in methods.iter_mut() {
            let matches = method
                .get("name")
                .and_then(|n| n.as_str())
                .is_some_and(|name| name.eq_ignore_ascii_case(stem));
            if matches {
                if let Value::Object(map) = method {
                    map.insert("description".to_string(), Value::String(text.clone()));
                    matched = true;
                }
            }
        }

        if !matched {
            log::debug!("description {} matches no method, ignored", path.display());
        }
    }
    Ok(())
}

/// Sort methods by name ascending; ties keep their original order.
///
/// Methods without a `name` sort first (the validator rejects them later).
pub fn sort_methods(methods: &mut [Value]) {
    methods.sort_by(|a, b| {
        let name_a = a.get("name").and_then(|n| n.as_str()).unwrap_or("");
        let name_b = b.get("name").and_then(|n| n.as_str()).unwrap_or("");
        name_a.cmp(name_b)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn collect_methods_concatenates_in_file_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.yaml"),
            "- name: eth_chainId\n- name: eth_blockNumber\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"name": "eth_call"}]"#).unwrap();

        let methods = collect_methods(dir.path()).unwrap();
        let names: Vec<&str> = methods
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["eth_chainId", "eth_blockNumber", "eth_call"]);
    }

    #[test]
    fn collect_methods_rejects_non_list() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.json"), r#"{"name": "eth_call"}"#).unwrap();

        let result = collect_methods(dir.path());
        assert!(matches!(result, Err(BuildError::UnexpectedShape { .. })));
    }

    #[test]
    fn collect_schemas_later_file_wins() {
        let dir = TempDir::new().unwrap();
        // Listing order is sorted by name, so b.json is loaded after a.json.
        fs::write(dir.path().join("a.json"), r#"{"Foo": {"type": "string"}}"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"Foo": {"type": "number"}}"#).unwrap();

        let schemas = collect_schemas(dir.path()).unwrap();
        assert_eq!(schemas["Foo"], json!({"type": "number"}));
    }

    #[test]
    fn collect_schemas_merges_distinct_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base.yaml"),
            "Address:\n  type: string\nHash:\n  type: string\n",
        )
        .unwrap();
        fs::write(dir.path().join("block.json"), r#"{"Block": {"type": "object"}}"#).unwrap();

        let schemas = collect_schemas(dir.path()).unwrap();
        assert_eq!(schemas.len(), 3);
        assert!(schemas.contains_key("Address"));
        assert!(schemas.contains_key("Block"));
    }

    #[test]
    fn overlay_matches_case_insensitively() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("eth_getbalance.txt"), "Returns balance.").unwrap();

        let mut methods = vec![json!({"name": "eth_getBalance", "description": "old"})];
        overlay_descriptions(&mut methods, dir.path()).unwrap();

        assert_eq!(methods[0]["description"], "Returns balance.");
    }

    #[test]
    fn overlay_ignores_unmatched_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("eth_unknown.txt"), "orphan").unwrap();

        let mut methods = vec![json!({"name": "eth_chainId"})];
        overlay_descriptions(&mut methods, dir.path()).unwrap();

        assert!(methods[0].get("description").is_none());
    }

    #[test]
    fn overlay_applies_to_all_matching_methods() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("eth_call.txt"), "Executes a call.").unwrap();

        // Duplicate names should not happen, but when they do every match
        // receives the overlay.
        let mut methods = vec![json!({"name": "eth_call"}), json!({"name": "ETH_CALL"})];
        overlay_descriptions(&mut methods, dir.path()).unwrap();

        assert_eq!(methods[0]["description"], "Executes a call.");
        assert_eq!(methods[1]["description"], "Executes a call.");
    }

    #[test]
    fn sort_methods_by_name_stable() {
        let mut methods = vec![
            json!({"name": "eth_call", "tag": 1}),
            json!({"name": "debug_traceCall"}),
            json!({"name": "eth_call", "tag": 2}),
        ];
        sort_methods(&mut methods);

        assert_eq!(methods[0]["name"], "debug_traceCall");
        assert_eq!(methods[1]["tag"], 1);
        assert_eq!(methods[2]["tag"], 2);
    }
}

//! Reference resolution - inlines every local `$ref` in a document.
//!
//! Replacement follows JSON Reference semantics: the object carrying the
//! `$ref` is replaced wholesale by the referenced value, sibling keys
//! discarded. Chains are tracked so circular references fail instead of
//! recursing forever.

use serde_json::{Map, Value};

use crate::error::BuildError;

/// Resolve every reachable `$ref` pointer into an equivalent document with
/// no remaining indirection.
///
/// Only local pointers (`#/...`) are supported; anything else is an
/// unresolved reference.
///
/// # Errors
///
/// Returns `BuildError::CircularRef` when a `$ref` chain revisits a pointer
/// already being resolved, or `BuildError::UnresolvedRef` for pointers that
/// do not resolve within the document.
pub fn dereference(doc: &Value) -> Result<Value, BuildError> {
    let mut in_flight = Vec::new();
    deref_value(doc, doc, &mut in_flight)
}

/// Empty `components.schemas` after dereferencing.
///
/// All registry content has been inlined into the methods, so the published
/// artifact carries no registry; the intermediate file keeps it.
pub fn clear_components(doc: &mut Value) {
    if let Some(Value::Object(components)) = doc.get_mut("components") {
        components.insert("schemas".to_string(), Value::Object(Map::new()));
    }
}

/// Navigate a JSON Pointer fragment (e.g. `#/components/schemas/Block`).
pub fn navigate_pointer<'a>(root: &'a Value, pointer: &str) -> Result<&'a Value, BuildError> {
    let path = pointer.trim_start_matches('#').trim_start_matches('/');
    if path.is_empty() {
        return Ok(root);
    }

    let mut current = root;
    for part in path.split('/') {
        // Unescape JSON Pointer encoding (~1 = /, ~0 = ~)
        let key = part.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(map) => map.get(&key),
            Value::Array(arr) => key.parse::<usize>().ok().and_then(|i| arr.get(i)),
            _ => None,
        }
        .ok_or_else(|| BuildError::UnresolvedRef {
            pointer: pointer.to_string(),
        })?;
    }
    Ok(current)
}

fn deref_value(
    root: &Value,
    value: &Value,
    in_flight: &mut Vec<String>,
) -> Result<Value, BuildError> {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref") {
                let pointer = reference.as_str().filter(|r| r.starts_with('#')).ok_or_else(
                    || BuildError::UnresolvedRef {
                        pointer: reference.to_string(),
                    },
                )?;

                if in_flight.iter().any(|p| p == pointer) {
                    return Err(BuildError::CircularRef {
                        pointer: pointer.to_string(),
                    });
                }

                let target = navigate_pointer(root, pointer)?;
                in_flight.push(pointer.to_string());
                let resolved = deref_value(root, target, in_flight)?;
                in_flight.pop();
                return Ok(resolved);
            }

            let mut result = Map::new();
            for (key, child) in map {
                result.insert(key.clone(), deref_value(root, child, in_flight)?);
            }
            Ok(Value::Object(result))
        }
        Value::Array(arr) => {
            let mut result = Vec::with_capacity(arr.len());
            for item in arr {
                result.push(deref_value(root, item, in_flight)?);
            }
            Ok(Value::Array(result))
        }
        other => Ok(other.clone()),
    }
}

/// Scan a value for any remaining `$ref` keyword.
pub fn contains_ref(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key("$ref") || map.values().any(contains_ref)
        }
        Value::Array(arr) => arr.iter().any(contains_ref),
        _ => false,
    }
}

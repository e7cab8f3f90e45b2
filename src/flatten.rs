//! Schema flattening - collapses `allOf` composition into single schemas.
//!
//! Members of an `allOf` all apply simultaneously, so their conjunction can
//! be expressed as one merged schema: properties union (last writer wins),
//! required set-union, tightest-wins for numeric bounds. The merge recurses
//! into `oneOf` branches and array `items`, since `allOf` can nest inside
//! either.

use serde_json::{Map, Value};

/// Keywords where the larger value is the tighter constraint.
const LOWER_BOUNDS: &[&str] = &[
    "minimum",
    "exclusiveMinimum",
    "minLength",
    "minItems",
    "minProperties",
];

/// Keywords where the smaller value is the tighter constraint.
const UPPER_BOUNDS: &[&str] = &[
    "maximum",
    "exclusiveMaximum",
    "maxLength",
    "maxItems",
    "maxProperties",
];

/// Flatten the `params` and `result` schemas of every method in a document.
pub fn flatten_document(doc: &mut Value) {
    let Some(Value::Array(methods)) = doc.get_mut("methods") else {
        return;
    };

    for method in methods {
        if let Some(Value::Array(params)) = method.get_mut("params") {
            for param in params {
                if let Some(schema) = param.get_mut("schema") {
                    *schema = flatten_schema(schema);
                }
            }
        }
        if let Some(schema) = method.pointer_mut("/result/schema") {
            *schema = flatten_schema(schema);
        }
    }
}

/// Produce a schema equivalent to the input with every `allOf` it touches
/// merged away.
///
/// The schema's own sibling keys form the merge base; `allOf` members are
/// flattened first (nested `allOf` included) and then merged in list order.
/// Flattening is idempotent.
pub fn flatten_schema(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };

    let mut result = Map::new();
    for (key, child) in map {
        match key.as_str() {
            "allOf" => {} // merged below
            "oneOf" => {
                result.insert(key.clone(), flatten_branches(child));
            }
            "items" => {
                result.insert(key.clone(), flatten_items(child));
            }
            _ => {
                result.insert(key.clone(), child.clone());
            }
        }
    }

    if let Some(Value::Array(members)) = map.get("allOf") {
        for member in members {
            if let Value::Object(flattened) = flatten_schema(member) {
                merge_member(&mut result, flattened);
            }
        }
    }

    Value::Object(result)
}

/// Flatten each branch of a `oneOf` list.
fn flatten_branches(branches: &Value) -> Value {
    match branches {
        Value::Array(arr) => Value::Array(arr.iter().map(flatten_schema).collect()),
        other => other.clone(),
    }
}

/// Flatten `items`, handling both the single-schema and tuple forms.
fn flatten_items(items: &Value) -> Value {
    match items {
        Value::Array(arr) => Value::Array(arr.iter().map(flatten_schema).collect()),
        other => flatten_schema(other),
    }
}

/// Merge one flattened `allOf` member into the accumulated schema.
fn merge_member(target: &mut Map<String, Value>, member: Map<String, Value>) {
    for (key, value) in member {
        if key == "properties" {
            merge_properties(target, value);
        } else if key == "required" {
            merge_required(target, value);
        } else if key == "additionalProperties" {
            // false on any member closes the merged object
            let closed = target.get("additionalProperties") == Some(&Value::Bool(false))
                || value == Value::Bool(false);
            target.insert(key, if closed { Value::Bool(false) } else { value });
        } else if LOWER_BOUNDS.contains(&key.as_str()) {
            merge_bound(target, key, value, |new, old| new > old);
        } else if UPPER_BOUNDS.contains(&key.as_str()) {
            merge_bound(target, key, value, |new, old| new < old);
        } else {
            target.insert(key, value);
        }
    }
}

/// Union `properties` mappings, later member wins per key.
fn merge_properties(target: &mut Map<String, Value>, value: Value) {
    let Value::Object(incoming) = value else {
        target.insert("properties".to_string(), value);
        return;
    };

    match target.get_mut("properties") {
        Some(Value::Object(existing)) => {
            for (name, prop) in incoming {
                existing.insert(name, prop);
            }
        }
        _ => {
            target.insert("properties".to_string(), Value::Object(incoming));
        }
    }
}

/// Set-union `required` lists, keeping first-occurrence order.
fn merge_required(target: &mut Map<String, Value>, value: Value) {
    let Value::Array(incoming) = value else {
        target.insert("required".to_string(), value);
        return;
    };

    match target.get_mut("required") {
        Some(Value::Array(existing)) => {
            for entry in incoming {
                if !existing.contains(&entry) {
                    existing.push(entry);
                }
            }
        }
        _ => {
            target.insert("required".to_string(), Value::Array(incoming));
        }
    }
}

/// Keep the tighter of two numeric bounds; non-numeric values fall back to
/// last-writer-wins.
fn merge_bound(
    target: &mut Map<String, Value>,
    key: String,
    value: Value,
    tighter: fn(f64, f64) -> bool,
) {
    let keep_new = match (value.as_f64(), target.get(&key).and_then(Value::as_f64)) {
        (Some(new), Some(old)) => tighter(new, old),
        _ => true,
    };
    if keep_new {
        target.insert(key, value);
    }
}

/// Scan a schema for any `allOf` remaining at the top level or inside the
/// `oneOf`/`items` nesting the flattener covers.
pub fn contains_all_of(schema: &Value) -> bool {
    let Value::Object(map) = schema else {
        return false;
    };
    if map.contains_key("allOf") {
        return true;
    }
    if let Some(Value::Array(branches)) = map.get("oneOf") {
        if branches.iter().any(contains_all_of) {
            return true;
        }
    }
    match map.get("items") {
        Some(Value::Array(arr)) => arr.iter().any(contains_all_of),
        Some(item) => contains_all_of(item),
        None => false,
    }
}

//! Final-document validation.
//!
//! Independent checks run against the persisted final artifact: a
//! meta-schema pass (every structural error collected and reported), a scan
//! for dangling `$ref` pointers, and a strict typed-parse pass. Neither
//! mutates the document; failures are a normal "build failed" outcome, not
//! a crash.

use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{SchemaError, ValidateError};

/// Reduced OpenRPC meta-schema the final artifact must conform to.
const META_SCHEMA: &str = include_str!("openrpc.schema.json");

/// Character budget for reported messages. `jsonschema` errors embed the
/// offending schema; the cut lands before that dump.
const MESSAGE_BUDGET: usize = 200;

/// Compile the embedded meta-schema once per process.
fn meta_validator() -> Result<&'static jsonschema::Validator, ValidateError> {
    static META: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

    META.get_or_init(|| {
        let meta: Value = serde_json::from_str(META_SCHEMA).map_err(|e| e.to_string())?;
        jsonschema::validator_for(&meta).map_err(|e| e.to_string())
    })
    .as_ref()
    .map_err(|message| ValidateError::InvalidMetaSchema {
        message: message.clone(),
    })
}

/// Check a document against the OpenRPC meta-schema.
///
/// Collects every structural error rather than stopping at the first.
///
/// # Errors
///
/// Returns `ValidateError::MetaSchema` with one `SchemaError` per violation.
pub fn validate_document(doc: &Value) -> Result<(), ValidateError> {
    let validator = meta_validator()?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(doc)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: truncate_message(&e.to_string()),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::MetaSchema { errors })
    }
}

/// Parse a document through the strict typed path.
///
/// This is independent of the meta-schema pass: a parse exception is its own
/// validation failure.
pub fn parse_document(doc: &Value) -> Result<ParsedDocument, ValidateError> {
    serde_json::from_value(doc.clone()).map_err(|e| ValidateError::Parse {
        message: truncate_message(&e.to_string()),
    })
}

/// Scan a document for dangling `$ref` pointers.
///
/// A final document must be fully dereferenced; any remaining `$ref` means
/// the resolver never ran against it.
///
/// # Errors
///
/// Returns `ValidateError::DanglingRefs` with one `SchemaError` per hit.
pub fn check_refs(doc: &Value) -> Result<(), ValidateError> {
    let mut errors = Vec::new();
    collect_refs(doc, "", &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::DanglingRefs { errors })
    }
}

fn collect_refs(value: &Value, path: &str, errors: &mut Vec<SchemaError>) {
    match value {
        Value::Object(map) => {
            if let Some(target) = map.get("$ref") {
                errors.push(SchemaError {
                    path: format!("{path}/$ref"),
                    message: format!("unresolved $ref {target}"),
                });
            }
            for (key, child) in map {
                collect_refs(child, &format!("{path}/{key}"), errors);
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                collect_refs(item, &format!("{path}/{i}"), errors);
            }
        }
        _ => {}
    }
}

/// Run every validation path, collecting all failures.
///
/// An empty result means the document is valid.
pub fn check(doc: &Value) -> Vec<ValidateError> {
    let mut failures = Vec::new();
    if let Err(e) = validate_document(doc) {
        failures.push(e);
    }
    if let Err(e) = check_refs(doc) {
        failures.push(e);
    }
    if let Err(e) = parse_document(doc) {
        failures.push(e);
    }
    failures
}

/// Strictly parsed view of a final document.
#[derive(Debug, Deserialize)]
pub struct ParsedDocument {
    pub openrpc: String,
    pub info: ParsedInfo,
    pub methods: Vec<ParsedMethod>,
}

#[derive(Debug, Deserialize)]
pub struct ParsedInfo {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct ParsedMethod {
    pub name: String,
    pub params: Vec<ParsedDescriptor>,
    pub result: ParsedDescriptor,
}

#[derive(Debug, Deserialize)]
pub struct ParsedDescriptor {
    pub name: Option<String>,
    pub schema: Value,
}

/// Cut a message to the reporting budget, on a character boundary, before
/// any embedded schema dump.
fn truncate_message(message: &str) -> String {
    let line = message.lines().next().unwrap_or("");
    if line.chars().count() <= MESSAGE_BUDGET {
        return line.to_string();
    }
    let truncated: String = line.chars().take(MESSAGE_BUDGET).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_doc() -> Value {
        json!({
            "openrpc": "1.2.4",
            "info": {
                "title": "Ethereum JSON-RPC Specification",
                "version": "0.0.0"
            },
            "methods": [{
                "name": "eth_chainId",
                "params": [],
                "result": {
                    "name": "chainId",
                    "schema": {"type": "string"}
                }
            }],
            "components": {"schemas": {}}
        })
    }

    #[test]
    fn valid_document_passes_both_paths() {
        let doc = valid_doc();
        assert!(check(&doc).is_empty());
    }

    #[test]
    fn method_missing_name_fails() {
        let mut doc = valid_doc();
        doc["methods"][0].as_object_mut().unwrap().remove("name");

        let before = doc.clone();
        let failures = check(&doc);
        // Caught independently by the meta-schema and parse paths.
        assert_eq!(failures.len(), 2);
        assert!(failures
            .iter()
            .any(|f| matches!(f, ValidateError::MetaSchema { .. })));
        assert!(failures
            .iter()
            .any(|f| matches!(f, ValidateError::Parse { .. })));
        // Checking never mutates the document.
        assert_eq!(doc, before);
    }

    #[test]
    fn dangling_ref_fails_check() {
        // Structurally valid envelope, but the result schema was never
        // dereferenced.
        let mut doc = valid_doc();
        doc["methods"][0]["result"]["schema"] =
            json!({"$ref": "#/components/schemas/Missing"});

        let before = doc.clone();
        let failures = check(&doc);
        assert_eq!(failures.len(), 1);
        match &failures[0] {
            ValidateError::DanglingRefs { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "/methods/0/result/schema/$ref");
                assert_eq!(failures[0].exit_code(), 1);
            }
            other => panic!("expected dangling-ref failure, got {other:?}"),
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn check_refs_reports_every_hit() {
        let doc = json!({
            "methods": [
                {"params": [{"schema": {"$ref": "#/a"}}]},
                {"result": {"schema": {"items": {"$ref": "#/b"}}}}
            ]
        });

        let result = check_refs(&doc);
        match result {
            Err(ValidateError::DanglingRefs { errors }) => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected dangling-ref failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_envelope_fields_fail_meta_schema() {
        let doc = json!({"methods": []});
        let result = validate_document(&doc);
        match result {
            Err(ValidateError::MetaSchema { errors }) => {
                assert!(!errors.is_empty());
            }
            other => panic!("expected meta-schema failure, got {other:?}"),
        }
    }

    #[test]
    fn descriptor_without_schema_fails() {
        let mut doc = valid_doc();
        doc["methods"][0]["result"] = json!({"name": "chainId"});

        let failures = check(&doc);
        assert!(!failures.is_empty());
    }

    #[test]
    fn params_may_omit_descriptor_name_in_parse_path() {
        let mut doc = valid_doc();
        doc["methods"][0]["params"] = json!([{"schema": {"type": "string"}}]);

        assert!(parse_document(&doc).is_ok());
    }

    #[test]
    fn parse_rejects_non_array_params() {
        let mut doc = valid_doc();
        doc["methods"][0]["params"] = json!({"name": "p"});

        let result = parse_document(&doc);
        assert!(matches!(result, Err(ValidateError::Parse { .. })));
    }

    #[test]
    fn truncate_message_caps_length() {
        let long = "x".repeat(500);
        let cut = truncate_message(&long);
        assert_eq!(cut.chars().count(), MESSAGE_BUDGET + 3);
        assert!(cut.ends_with("..."));

        assert_eq!(truncate_message("short"), "short");
    }

    #[test]
    fn truncate_message_drops_schema_dump_lines() {
        let message = "value is not of type \"object\"\n\nschema in question:\n{...}";
        assert_eq!(truncate_message(message), "value is not of type \"object\"");
    }
}

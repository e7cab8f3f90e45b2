//! The OpenRPC envelope and its fixed assembly metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OpenRPC specification version written into every assembled document.
pub const OPENRPC_VERSION: &str = "1.2.4";

/// Placeholder document version; not derived from any source of truth.
pub const DOCUMENT_VERSION: &str = "0.0.0";

const TITLE: &str = "Ethereum JSON-RPC Specification";
const DESCRIPTION: &str = "A specification of the standard interface for Ethereum clients.";
const LICENSE_NAME: &str = "CC0-1.0";
const LICENSE_URL: &str = "https://creativecommons.org/publicdomain/zero/1.0/legalcode";

/// License metadata inside `info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: String,
}

/// The `info` block of the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub license: License,
    pub version: String,
}

/// The `components` block; only `schemas` is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    pub schemas: Map<String, Value>,
}

/// An assembled OpenRPC document.
///
/// Methods stay as raw values since fragments may carry any OpenRPC-allowed
/// field; only the envelope itself is typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecDocument {
    pub openrpc: String,
    pub info: Info,
    pub methods: Vec<Value>,
    pub components: Components,
}

/// Wrap aggregated methods and schemas into the envelope.
///
/// No validation happens here; the assembled document may still contain
/// `$ref` pointers and `allOf` composition.
pub fn assemble(methods: Vec<Value>, schemas: Map<String, Value>) -> SpecDocument {
    SpecDocument {
        openrpc: OPENRPC_VERSION.to_string(),
        info: Info {
            title: TITLE.to_string(),
            description: DESCRIPTION.to_string(),
            license: License {
                name: LICENSE_NAME.to_string(),
                url: LICENSE_URL.to_string(),
            },
            version: DOCUMENT_VERSION.to_string(),
        },
        methods,
        components: Components { schemas },
    }
}

/// Extract the namespace of a method name: the prefix before the first `_`
/// (e.g. `eth_getBalance` -> `eth`). Names without an underscore fall into
/// `other`.
pub fn namespace(method_name: &str) -> &str {
    match method_name.split_once('_') {
        Some((prefix, _)) => prefix,
        None => "other",
    }
}

/// List the distinct namespaces present in a method sequence, in first-seen
/// order. Used for the build summary.
pub fn namespaces(methods: &[Value]) -> Vec<String> {
    let mut seen = Vec::new();
    for method in methods {
        if let Some(name) = method.get("name").and_then(|n| n.as_str()) {
            let ns = namespace(name);
            if !seen.iter().any(|s| s == ns) {
                seen.push(ns.to_string());
            }
        }
    }
    seen
}

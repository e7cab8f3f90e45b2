//! OpenRPC Build Pipeline
//!
//! Assembles an OpenRPC document for the Ethereum JSON-RPC API from many
//! small fragment files, then dereferences, flattens and validates it.
//!
//! The pipeline runs in fixed stages: per-method and per-schema fragments
//! are loaded and aggregated, wrapped into the OpenRPC envelope, persisted
//! as the intermediate artifact, dereferenced (`$ref` inlined with cycle
//! detection), `allOf`-flattened, and persisted as the final artifact.
//! Validation runs separately against the persisted final file.
//!
//! # Example
//!
//! ```
//! use openrpc_build::flatten_schema;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "allOf": [
//!         {"type": "object", "properties": {"a": {"type": "string"}}, "required": ["a"]},
//!         {"properties": {"b": {"type": "number"}}, "required": ["b"]}
//!     ]
//! });
//!
//! let flattened = flatten_schema(&schema);
//! assert_eq!(flattened, json!({
//!     "type": "object",
//!     "properties": {"a": {"type": "string"}, "b": {"type": "number"}},
//!     "required": ["a", "b"]
//! }));
//! ```

mod aggregate;
mod dereference;
mod document;
mod error;
mod flatten;
mod loader;
mod pipeline;
mod validator;

pub use aggregate::{collect_methods, collect_schemas, overlay_descriptions, sort_methods};
pub use dereference::{clear_components, contains_ref, dereference, navigate_pointer};
pub use document::{
    assemble, namespace, namespaces, Components, Info, License, SpecDocument, DOCUMENT_VERSION,
    OPENRPC_VERSION,
};
pub use error::{BuildError, SchemaError, ValidateError};
pub use flatten::{contains_all_of, flatten_document, flatten_schema};
pub use loader::{
    detect_format, load_dir, load_document, load_fragment, write_json_pretty, Format,
};
pub use pipeline::{build, finalize, BuildConfig, BuildOutput};
pub use validator::{check, check_refs, parse_document, validate_document, ParsedDocument};

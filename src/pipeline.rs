//! End-to-end build sequencing.
//!
//! Loader -> Aggregator -> Assembler -> intermediate write -> Reference
//! Resolver -> Schema Flattener -> final write. Strictly sequential and
//! fail-fast: the first error aborts the remaining stages and skips any
//! further writes.

use std::path::PathBuf;

use serde_json::Value;

use crate::aggregate;
use crate::dereference;
use crate::document::{self, SpecDocument};
use crate::error::BuildError;
use crate::flatten;
use crate::loader;

/// Input and output locations for one build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory of per-method fragment files (JSON or YAML lists).
    pub methods_dir: PathBuf,
    /// Directory of per-schema fragment files (JSON or YAML mappings).
    pub schemas_dir: PathBuf,
    /// Optional directory of plain-text description overlays.
    pub descriptions_dir: Option<PathBuf>,
    /// Sort methods by name before assembling.
    pub sort: bool,
    /// Where the assembled-but-not-dereferenced document is written.
    pub intermediate_path: PathBuf,
    /// Where the dereferenced, flattened document is written.
    pub output_path: PathBuf,
}

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildOutput {
    /// Number of aggregated methods.
    pub method_count: usize,
    /// Number of schemas in the intermediate registry.
    pub schema_count: usize,
    /// Method namespaces present, in first-seen order.
    pub namespaces: Vec<String>,
}

/// Aggregate fragments into the intermediate document.
///
/// This is the pre-dereference stage; the returned document still carries
/// `$ref` pointers and `allOf` composition.
pub fn assemble(config: &BuildConfig) -> Result<SpecDocument, BuildError> {
    let mut methods = aggregate::collect_methods(&config.methods_dir)?;
    let schemas = aggregate::collect_schemas(&config.schemas_dir)?;

    if let Some(dir) = &config.descriptions_dir {
        aggregate::overlay_descriptions(&mut methods, dir)?;
    }
    if config.sort {
        aggregate::sort_methods(&mut methods);
    }

    Ok(document::assemble(methods, schemas))
}

/// Dereference and flatten an intermediate document into the final artifact.
pub fn finalize(intermediate: &Value) -> Result<Value, BuildError> {
    let mut final_doc = dereference::dereference(intermediate)?;
    dereference::clear_components(&mut final_doc);
    flatten::flatten_document(&mut final_doc);
    Ok(final_doc)
}

/// Run the whole pipeline and persist both artifacts.
///
/// The intermediate file is written first and re-read as the resolver input,
/// making the committed intermediate the source of truth for the final
/// artifact.
pub fn build(config: &BuildConfig) -> Result<BuildOutput, BuildError> {
    let intermediate = assemble(config)?;
    loader::write_json_pretty(&config.intermediate_path, &intermediate)?;

    let reloaded = loader::load_document(&config.intermediate_path)?;
    let final_doc = finalize(&reloaded)?;
    loader::write_json_pretty(&config.output_path, &final_doc)?;

    Ok(BuildOutput {
        method_count: intermediate.methods.len(),
        schema_count: intermediate.components.schemas.len(),
        namespaces: document::namespaces(&intermediate.methods),
    })
}

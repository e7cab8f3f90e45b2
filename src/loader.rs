//! Fragment loading and JSON persistence.
//!
//! Fragment directories hold many small JSON or YAML files; each file parses
//! to one `serde_json::Value`. The listing order is pinned (sorted by file
//! name) so that later stages resolve duplicate keys deterministically.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::BuildError;

/// Fragment file format, selected by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

/// Detect the parse format for a path from its extension.
///
/// Returns `None` for extensions the loader does not parse (e.g. `.txt`
/// description overlays, editor droppings).
pub fn detect_format(path: &Path) -> Option<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(Format::Json),
        Some("yaml") | Some("yml") => Some(Format::Yaml),
        _ => None,
    }
}

/// Parse a single fragment file according to its extension.
///
/// # Errors
///
/// Returns `BuildError::UnsupportedFormat` for unrecognized extensions,
/// `BuildError::InvalidJson`/`InvalidYaml` for malformed content.
pub fn load_fragment(path: &Path) -> Result<Value, BuildError> {
    let format = detect_format(path).ok_or_else(|| BuildError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let content = read_file(path)?;

    match format {
        Format::Json => serde_json::from_str(&content).map_err(|source| BuildError::InvalidJson {
            path: path.to_path_buf(),
            source,
        }),
        Format::Yaml => {
            serde_yaml_ng::from_str(&content).map_err(|source| BuildError::InvalidYaml {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Load every parseable fragment in a directory, sorted by file name.
///
/// Files whose extension is not `.json`/`.yaml`/`.yml` are skipped.
/// Returns `(path, value)` pairs so callers can attribute errors to files.
///
/// # Errors
///
/// Returns `BuildError::DirNotFound` if the directory is missing, or the
/// first read/parse error encountered. Any failure aborts the whole listing.
pub fn load_dir(dir: &Path) -> Result<Vec<(PathBuf, Value)>, BuildError> {
    let mut fragments = Vec::new();
    for path in list_dir(dir)? {
        if detect_format(&path).is_none() {
            log::debug!("skipping non-fragment file {}", path.display());
            continue;
        }
        let value = load_fragment(&path)?;
        fragments.push((path, value));
    }
    Ok(fragments)
}

/// List a directory's files sorted by name.
pub fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !dir.is_dir() {
        return Err(BuildError::DirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| BuildError::ReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BuildError::ReadError {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read a file to a string with path-attributed errors.
pub fn read_file(path: &Path) -> Result<String, BuildError> {
    if !path.exists() {
        return Err(BuildError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| BuildError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a previously written document file (always JSON).
pub fn load_document(path: &Path) -> Result<Value, BuildError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| BuildError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a value as pretty-printed JSON with tab indentation.
///
/// Both persisted artifacts (intermediate and final) use this format so
/// committed diffs stay stable.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), BuildError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|source| BuildError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
    buf.push(b'\n');

    let mut file = std::fs::File::create(path).map_err(|source| BuildError::WriteError {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(&buf).map_err(|source| BuildError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

use crate::config::TargetLang;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "document";

/// Flat string-to-string document; iteration follows the key order of the file.
pub type Document = IndexMap<String, String>;

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("value for key `{key}` in {} is not a string", path.display())]
    NonStringValue { path: PathBuf, key: String },

    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Reads a flat JSON object of strings. Any other value type is rejected with the offending key.
pub fn load_document(path: &Path) -> Result<Document, DocumentError> {
    if !path.is_file() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let values: IndexMap<String, Value> =
        serde_json::from_str(&raw).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let doc = values
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => Ok((key, text)),
            _ => Err(DocumentError::NonStringValue {
                path: path.to_path_buf(),
                key,
            }),
        })
        .collect::<Result<Document, _>>()?;

    tracing::debug!(target: LOG_TARGET, path = %path.display(), keys = doc.len(), "document loaded");
    Ok(doc)
}

pub fn output_path(output_dir: &Path, lang: &TargetLang) -> PathBuf {
    output_dir.join(format!("{}.json", lang.as_str()))
}

/// Two-space indented JSON, keys in document order.
pub fn to_pretty_json(doc: &Document) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(doc).map_err(DocumentError::Serialize)
}

/// Writes `doc` as pretty JSON to `<output_dir>/<lang>.json`, replacing any existing file.
pub fn write_document(
    doc: &Document,
    output_dir: &Path,
    lang: &TargetLang,
) -> Result<PathBuf, DocumentError> {
    std::fs::create_dir_all(output_dir).map_err(|source| DocumentError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_path(output_dir, lang);
    let body = to_pretty_json(doc)?;
    std::fs::write(&path, body).map_err(|source| DocumentError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(target: LOG_TARGET, path = %path.display(), keys = doc.len(), "document written");
    Ok(path)
}

// SPDX-License-Identifier: PMPL-1.0-or-later

//! Reading and writing per-language translation files

use crate::error::SyncError;
use crate::reconcile::TranslationMap;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// A missing or blank file reads as an empty mapping.
pub fn read_translation_file(path: &Path) -> Result<TranslationMap, SyncError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TranslationMap::new()),
        Err(e) => return Err(SyncError::io(path, e)),
    };
    if content.trim().is_empty() {
        return Ok(TranslationMap::new());
    }
    match serde_json::from_str(&content).map_err(|e| SyncError::parse(path, e))? {
        Value::Object(object) => Ok(object.into_iter().collect()),
        _ => Err(SyncError::TranslationNotObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Serialized form of the file at `path`: pretty JSON, keys sorted,
/// trailing newline.
pub fn render(path: &Path, translations: &TranslationMap) -> Result<String, SyncError> {
    let mut text =
        serde_json::to_string_pretty(translations).map_err(|source| SyncError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    text.push('\n');
    Ok(text)
}

/// Replace the file through a sibling temp file and a rename. Returns `false`
/// when the file already holds exactly this content and was left alone.
pub fn write_translation_file(
    path: &Path,
    translations: &TranslationMap,
) -> Result<bool, SyncError> {
    let text = render(path, translations)?;
    if fs::read_to_string(path).ok().as_deref() == Some(text.as_str()) {
        return Ok(false);
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|e| SyncError::write(path, e))?;
    file.write_all(text.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| SyncError::write(path, e))?;
    file.persist(path)
        .map_err(|e| SyncError::write(path, e.error))?;
    Ok(true)
}

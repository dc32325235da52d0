// SPDX-License-Identifier: PMPL-1.0-or-later

//! Loading of schema documents and entry lists from a model directory

use crate::error::SyncError;
use crate::types::Entry;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub fn read_schema(path: &Path) -> Result<Value, SyncError> {
    let content = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| SyncError::parse(path, e))
}

/// Locate the first existing data file among `candidates`.
pub fn find_data_file(dir: &Path, candidates: &[String]) -> Result<PathBuf, SyncError> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| SyncError::DataFileMissing {
            dir: dir.to_path_buf(),
            tried: candidates.to_vec(),
        })
}

/// Read an ordered list of entries. Entries are kept as raw values so that
/// malformed ones can be reported instead of failing the whole file.
pub fn read_entries(path: &Path) -> Result<Vec<Entry>, SyncError> {
    let content = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    let document: Value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| SyncError::parse(path, e))?
        }
        _ => serde_json::from_str(&content).map_err(|e| SyncError::parse(path, e))?,
    };
    match document {
        Value::Array(entries) => Ok(entries),
        _ => Err(SyncError::DataNotArray {
            path: path.to_path_buf(),
        }),
    }
}

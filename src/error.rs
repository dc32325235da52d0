// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the synchronization pipeline

use crate::keys::KeyError;
use crate::schema::SchemaError;
use crate::types::{BadEntry, DuplicateKey, Violation};
use std::path::PathBuf;

/// Failure of a pipeline stage. Every variant is fatal for the model it
/// occurred in and for that model only.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error(
        "schema {} is not a valid draft-04 JSON schema:\n{}",
        .path.display(),
        list(.violations)
    )]
    SchemaMeta {
        path: PathBuf,
        violations: Vec<Violation>,
    },

    #[error("schema {}: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("no data file found in {} (tried {})", .dir.display(), .tried.join(", "))]
    DataFileMissing { dir: PathBuf, tried: Vec<String> },

    #[error("{} must contain an array of entries", .path.display())]
    DataNotArray { path: PathBuf },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("translation file {} must contain a JSON object", .path.display())]
    TranslationNotObject { path: PathBuf },

    #[error("serializing {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Write {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SyncError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Composite failure of an entry registry build.
#[derive(Debug, thiserror::Error)]
#[error("{}", summarize(.model, .bad_entries, .duplicates))]
pub struct RegistryError {
    pub model: String,
    pub bad_entries: Vec<BadEntry>,
    pub duplicates: Vec<DuplicateKey>,
}

fn list<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn summarize(model: &str, bad_entries: &[BadEntry], duplicates: &[DuplicateKey]) -> String {
    let mut lines = vec![format!(
        "model \"{}\" has {} bad entr{} and {} duplicate primary key{}:",
        model,
        bad_entries.len(),
        if bad_entries.len() == 1 { "y" } else { "ies" },
        duplicates.len(),
        if duplicates.len() == 1 { "" } else { "s" },
    )];
    if !bad_entries.is_empty() {
        lines.push(list(bad_entries));
    }
    if !duplicates.is_empty() {
        lines.push(list(duplicates));
    }
    lines.join("\n")
}

// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions shared by the reconciliation pipeline

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// A raw data entry, exactly as read from the model's data file.
pub type Entry = Value;

/// `<model_name>|<joined primary key component values>`
pub type PrimaryKey = String;

/// `<primary_key>|<field_name>`
pub type TranslationKey = String;

/// Separator between key segments.
pub const KEY_SEPARATOR: char = '|';

/// Separator between primary key component values.
pub const COMPONENT_SEPARATOR: &str = ",";

/// Prefix of the sentinel value marking an untranslated key.
pub const PLACEHOLDER_PREFIX: &str = "[TOTRANSLATE:";

/// Reserved translation file key holding the language tag.
pub const LANG_KEY: &str = "lang";

/// Build the placeholder value for a translation key.
pub fn placeholder(key: &str) -> String {
    format!("{}{}]", PLACEHOLDER_PREFIX, key)
}

/// Keys that are never reconciled: the language tag and `_` comments.
pub fn is_reserved_key(key: &str) -> bool {
    key == LANG_KEY || key.starts_with('_')
}

/// A single schema violation, located by JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub instance_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// An entry that was excluded from the primary key index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadEntry {
    /// Position in the data file.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hid: Option<String>,
    pub raw: Value,
    pub errors: Vec<String>,
}

impl fmt::Display for BadEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hid {
            Some(hid) => write!(f, "entry #{} (hid \"{}\")", self.index, hid)?,
            None => write!(f, "entry #{}", self.index)?,
        }
        write!(f, ": {}", self.errors.join("; "))
    }
}

/// Two valid entries deriving the same primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub primary_key: String,
    pub first_index: usize,
    pub duplicate_index: usize,
    pub hid: String,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry #{} (hid \"{}\") duplicates primary key \"{}\" of entry #{}",
            self.duplicate_index, self.hid, self.primary_key, self.first_index
        )
    }
}

/// Outcome of reconciling one language file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageReport {
    pub lang: String,
    pub path: PathBuf,
    pub expected_mandatory: usize,
    pub expected_optional: usize,
    /// Mandatory keys that received a placeholder during this run.
    pub inserted: Vec<String>,
    pub untranslated: Vec<String>,
    pub extraneous: Vec<String>,
    /// Keys whose value is not a string.
    pub non_string: Vec<String>,
    /// Whether the file on disk differs (or would differ) from the repaired content.
    pub changed: bool,
    pub written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LanguageReport {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ModelStatus {
    Passed,
    Failed(String),
    Skipped(String),
}

impl ModelStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, ModelStatus::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ModelStatus::Skipped(_))
    }
}

/// Everything learned while synchronizing a single model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub name: String,
    pub status: ModelStatus,
    pub entry_count: usize,
    pub indexed_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub bad_entries: Vec<BadEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub duplicates: Vec<DuplicateKey>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub schema_violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub languages: Vec<LanguageReport>,
}

impl ModelReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ModelStatus::Passed,
            entry_count: 0,
            indexed_count: 0,
            bad_entries: Vec::new(),
            duplicates: Vec::new(),
            schema_violations: Vec::new(),
            languages: Vec::new(),
        }
    }

    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut report = Self::new(name);
        report.status = ModelStatus::Skipped(reason.into());
        report
    }

    pub fn untranslated_count(&self) -> usize {
        self.languages.iter().map(|l| l.untranslated.len()).sum()
    }

    pub fn extraneous_count(&self) -> usize {
        self.languages.iter().map(|l| l.extraneous.len()).sum()
    }
}

/// Aggregate of every model processed in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub created_at: String,
    pub root: PathBuf,
    pub dry_run: bool,
    pub i18n: bool,
    pub models: Vec<ModelReport>,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.models
            .iter()
            .filter(|m| m.status == ModelStatus::Passed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.models.iter().filter(|m| m.status.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.models.iter().filter(|m| m.status.is_skipped()).count()
    }

    /// True unless at least one non-skipped model failed.
    pub fn succeeded(&self) -> bool {
        self.failed() == 0
    }
}

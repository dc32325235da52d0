// SPDX-License-Identifier: PMPL-1.0-or-later

//! JSON-Schema handling for model schemas.
//!
//! Validation is delegated to the `jsonschema` crate in draft-04 mode. A
//! schema is first checked against the embedded draft-04 meta-schema, then
//! compiled into an [`EntryValidator`] that reports every violation of an
//! entry in one pass rather than stopping at the first.

use crate::error::SyncError;
use crate::types::Violation;
use jsonschema::{Draft, JSONSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

const DRAFT_04_META_SCHEMA: &str = include_str!("draft-04.json");

/// Key of the non-standard extension block inside a schema document.
pub const EXTENSIONS_KEY: &str = "offirmo_extensions";

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing \"offirmo_extensions\" block")]
    MissingExtensions,
    #[error("invalid \"offirmo_extensions\" block: {0}")]
    InvalidExtensions(#[source] serde_json::Error),
    #[error("primary_key_components must name at least one field")]
    NoKeyComponents,
    #[error("empty i18n field name")]
    EmptyI18nField,
    #[error("could not be compiled: {0}")]
    Compile(String),
}

/// Non-standard part of a model schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaExtensions {
    #[serde(alias = "human_unique_key_components")]
    pub primary_key_components: Vec<String>,
    /// Language tag (or `*`) to mandatory translatable field names.
    #[serde(default)]
    pub i18n_keys_mandatory: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub i18n_keys_optional: BTreeMap<String, Vec<String>>,
}

impl SchemaExtensions {
    pub fn from_document(document: &Value) -> Result<Self, SchemaError> {
        let block = document
            .get(EXTENSIONS_KEY)
            .ok_or(SchemaError::MissingExtensions)?;
        let extensions: SchemaExtensions =
            serde_json::from_value(block.clone()).map_err(SchemaError::InvalidExtensions)?;
        if extensions.primary_key_components.is_empty() {
            return Err(SchemaError::NoKeyComponents);
        }
        if extensions
            .i18n_keys_mandatory
            .values()
            .chain(extensions.i18n_keys_optional.values())
            .flatten()
            .any(|field| field.is_empty())
        {
            return Err(SchemaError::EmptyI18nField);
        }
        Ok(extensions)
    }
}

/// Validates schema documents and compiles them into entry validators.
pub struct SchemaValidator {
    meta: JSONSchema,
}

impl SchemaValidator {
    pub fn new() -> anyhow::Result<Self> {
        let document: Value = serde_json::from_str(DRAFT_04_META_SCHEMA)?;
        let meta = compile_draft4(&document)
            .map_err(|e| anyhow::anyhow!("compiling draft-04 meta-schema: {}", e))?;
        Ok(Self { meta })
    }

    /// Check a schema document against the draft-04 meta-schema.
    pub fn validate_meta(&self, schema: &Value) -> Result<(), Vec<Violation>> {
        match self.meta.validate(schema) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors.map(violation).collect()),
        }
    }

    pub fn compile(&self, schema: &Value) -> Result<EntryValidator, SchemaError> {
        compile_draft4(schema).map(|compiled| EntryValidator { compiled })
    }
}

fn compile_draft4(schema: &Value) -> Result<JSONSchema, SchemaError> {
    JSONSchema::options()
        .with_draft(Draft::Draft4)
        .compile(schema)
        .map_err(|e| SchemaError::Compile(e.to_string()))
}

fn violation(error: jsonschema::ValidationError<'_>) -> Violation {
    Violation {
        instance_path: error.instance_path.to_string(),
        message: error.to_string(),
    }
}

/// Compiled schema for one model's entries.
pub struct EntryValidator {
    compiled: JSONSchema,
}

impl EntryValidator {
    /// All violations of `entry`; empty when valid.
    pub fn validate(&self, entry: &Value) -> Vec<Violation> {
        match self.compiled.validate(entry) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(violation).collect(),
        }
    }
}

/// A schema that passed meta-validation, with its extensions and validator.
pub struct ModelSchema {
    pub extensions: SchemaExtensions,
    pub validator: EntryValidator,
}

impl ModelSchema {
    pub fn from_document(
        path: &Path,
        document: &Value,
        validator: &SchemaValidator,
    ) -> Result<Self, SyncError> {
        let schema_error = |source| SyncError::Schema {
            path: path.to_path_buf(),
            source,
        };
        validator
            .validate_meta(document)
            .map_err(|violations| SyncError::SchemaMeta {
                path: path.to_path_buf(),
                violations,
            })?;
        let extensions = SchemaExtensions::from_document(document).map_err(schema_error)?;
        let entry_validator = validator.compile(document).map_err(schema_error)?;
        Ok(Self {
            extensions,
            validator: entry_validator,
        })
    }
}

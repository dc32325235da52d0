// SPDX-License-Identifier: PMPL-1.0-or-later

//! Primary key and translation key derivation.
//!
//! A primary key is `<model>|<component values joined with ','>`; a
//! translation key appends `|<field>` to it. Both builders are pure and only
//! read the schema extension block they were created from.

use crate::schema::SchemaExtensions;
use crate::types::{Entry, PrimaryKey, TranslationKey, COMPONENT_SEPARATOR, KEY_SEPARATOR};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Wildcard language selector in `i18n_keys_*` maps.
pub const ANY_LANG: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("entry is not an object")]
    NotAnObject,
    #[error("primary key component \"{0}\" is missing")]
    MissingComponent(String),
    #[error("primary key component \"{0}\" is empty")]
    EmptyComponent(String),
    #[error("primary key component \"{field}\" must be a string, number or boolean, got {kind}")]
    InvalidComponent { field: String, kind: &'static str },
}

#[derive(Debug, Clone)]
pub struct PrimaryKeyBuilder {
    model: String,
    components: Vec<String>,
}

impl PrimaryKeyBuilder {
    pub fn new(model: &str, extensions: &SchemaExtensions) -> Self {
        Self {
            model: model.to_string(),
            components: extensions.primary_key_components.clone(),
        }
    }

    pub fn primary_key(&self, entry: &Entry) -> Result<PrimaryKey, KeyError> {
        let object = entry.as_object().ok_or(KeyError::NotAnObject)?;
        let mut values = Vec::with_capacity(self.components.len());
        for field in &self.components {
            let value = object
                .get(field)
                .ok_or_else(|| KeyError::MissingComponent(field.clone()))?;
            values.push(component_text(field, value)?);
        }
        Ok(format!(
            "{}{}{}",
            self.model,
            KEY_SEPARATOR,
            values.join(COMPONENT_SEPARATOR)
        ))
    }
}

fn component_text(field: &str, value: &Value) -> Result<String, KeyError> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => return Err(KeyError::EmptyComponent(field.to_string())),
        Value::Array(_) => {
            return Err(KeyError::InvalidComponent {
                field: field.to_string(),
                kind: "an array",
            })
        }
        Value::Object(_) => {
            return Err(KeyError::InvalidComponent {
                field: field.to_string(),
                kind: "an object",
            })
        }
    };
    if text.is_empty() {
        return Err(KeyError::EmptyComponent(field.to_string()));
    }
    Ok(text)
}

/// Translation keys one entry requires (mandatory) or may carry (optional).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct I18nKeys {
    pub mandatory: Vec<TranslationKey>,
    pub optional: Vec<TranslationKey>,
}

/// Derives translation keys for a fixed language.
#[derive(Debug, Clone)]
pub struct I18nKeyBuilder {
    primary: PrimaryKeyBuilder,
    mandatory_fields: Vec<String>,
    optional_fields: Vec<String>,
}

impl I18nKeyBuilder {
    pub fn new(model: &str, extensions: &SchemaExtensions, lang: &str) -> Self {
        Self {
            primary: PrimaryKeyBuilder::new(model, extensions),
            mandatory_fields: fields_for(&extensions.i18n_keys_mandatory, lang),
            optional_fields: fields_for(&extensions.i18n_keys_optional, lang),
        }
    }

    pub fn i18n_keys(&self, entry: &Entry) -> Result<I18nKeys, KeyError> {
        let primary_key = self.primary.primary_key(entry)?;
        Ok(self.keys_for(&primary_key))
    }

    /// Translation keys for an already derived primary key.
    pub fn keys_for(&self, primary_key: &str) -> I18nKeys {
        let scoped = |field: &String| format!("{}{}{}", primary_key, KEY_SEPARATOR, field);
        I18nKeys {
            mandatory: self.mandatory_fields.iter().map(scoped).collect(),
            optional: self.optional_fields.iter().map(scoped).collect(),
        }
    }
}

/// Wildcard fields first, then the language's own, in declaration order.
fn fields_for(declared: &BTreeMap<String, Vec<String>>, lang: &str) -> Vec<String> {
    let mut fields: Vec<String> = declared.get(ANY_LANG).cloned().unwrap_or_default();
    if let Some(specific) = declared.get(lang) {
        fields.extend(specific.iter().cloned());
    }
    fields
}

/// Union of translation keys expected for one language across a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedKeys {
    pub mandatory: BTreeSet<TranslationKey>,
    pub optional: BTreeSet<TranslationKey>,
}

impl ExpectedKeys {
    pub fn collect<'a, I>(builder: &I18nKeyBuilder, entries: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut expected = ExpectedKeys::default();
        for entry in entries {
            let keys = builder.i18n_keys(entry)?;
            expected.mandatory.extend(keys.mandatory);
            expected.optional.extend(keys.optional);
        }
        Ok(expected)
    }
}

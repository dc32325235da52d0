// SPDX-License-Identifier: PMPL-1.0-or-later

//! Entry registry: classifies a model's raw entries and indexes the valid
//! ones by primary key.
//!
//! Classification never stops early. Every entry is examined and every bad
//! one is collected, so a single malformed record cannot hide others.

use crate::error::RegistryError;
use crate::keys::PrimaryKeyBuilder;
use crate::schema::ModelSchema;
use crate::types::{BadEntry, DuplicateKey, Entry, PrimaryKey};
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};

/// Field carrying the human-readable identifier of an entry.
pub const HID_FIELD: &str = "hid";

/// Valid entries of one model, by primary key.
#[derive(Debug, Clone, Default)]
pub struct EntryRegistry {
    index: BTreeMap<PrimaryKey, IndexedEntry>,
}

#[derive(Debug, Clone)]
struct IndexedEntry {
    /// Position in the data file.
    position: usize,
    entry: Entry,
}

impl EntryRegistry {
    pub fn build(
        model: &str,
        schema: &ModelSchema,
        raw_entries: Vec<Entry>,
    ) -> Result<EntryRegistry, RegistryError> {
        let keys = PrimaryKeyBuilder::new(model, &schema.extensions);
        let mut index: BTreeMap<PrimaryKey, IndexedEntry> = BTreeMap::new();
        let mut bad_entries = Vec::new();
        let mut duplicates = Vec::new();

        for (position, raw) in raw_entries.into_iter().enumerate() {
            if !raw.is_object() {
                bad_entries.push(BadEntry {
                    index: position,
                    hid: None,
                    raw,
                    errors: vec!["entry is not an object".to_string()],
                });
                continue;
            }

            let (hid, mut errors) = match check_hid(&raw) {
                Ok(hid) => (Some(hid), Vec::new()),
                Err(reason) => (None, vec![reason.to_string()]),
            };
            errors.extend(
                schema
                    .validator
                    .validate(&raw)
                    .into_iter()
                    .map(|violation| violation.to_string()),
            );
            let primary_key = match keys.primary_key(&raw) {
                Ok(key) => Some(key),
                Err(err) => {
                    errors.push(err.to_string());
                    None
                }
            };

            match (hid, primary_key) {
                (Some(hid), Some(primary_key)) if errors.is_empty() => {
                    match index.entry(primary_key) {
                        btree_map::Entry::Vacant(slot) => {
                            slot.insert(IndexedEntry {
                                position,
                                entry: raw,
                            });
                        }
                        btree_map::Entry::Occupied(existing) => {
                            duplicates.push(DuplicateKey {
                                primary_key: existing.key().clone(),
                                first_index: existing.get().position,
                                duplicate_index: position,
                                hid,
                            });
                        }
                    }
                }
                (hid, _) => bad_entries.push(BadEntry {
                    index: position,
                    hid: hid.or_else(|| hid_of(&raw)),
                    raw,
                    errors,
                }),
            }
        }

        if bad_entries.is_empty() && duplicates.is_empty() {
            Ok(EntryRegistry { index })
        } else {
            Err(RegistryError {
                model: model.to_string(),
                bad_entries,
                duplicates,
            })
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Valid entries in primary key order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.index.values().map(|indexed| &indexed.entry)
    }
}

fn check_hid(raw: &Entry) -> Result<String, &'static str> {
    match raw.get(HID_FIELD) {
        Some(Value::String(hid)) if !hid.is_empty() => Ok(hid.clone()),
        Some(Value::String(_)) => Err("hid is empty"),
        Some(_) => Err("hid is not a string"),
        None => Err("entry is missing its hid"),
    }
}

/// Best-effort hid for diagnostics.
fn hid_of(raw: &Entry) -> Option<String> {
    match raw.get(HID_FIELD)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

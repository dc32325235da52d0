// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation reconciliation.
//!
//! Diffs the translation keys a language is expected to carry against the
//! keys present in its file and computes the repaired content:
//!
//! - a missing mandatory key gets a `[TOTRANSLATE:<key>]` placeholder so the
//!   gap stays visible to downstream consumers;
//! - a missing optional key is left absent;
//! - a present key that no current entry derives is extraneous, reported and
//!   kept verbatim. Translator-authored content is never deleted here.
//!
//! Repair is additive only, so reconciling the output again changes nothing.

use crate::keys::ExpectedKeys;
use crate::types::{is_reserved_key, placeholder, LANG_KEY, PLACEHOLDER_PREFIX};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Content of a translation file. Sorted so that written files diff cleanly.
pub type TranslationMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub repaired: TranslationMap,
    /// Mandatory keys that received a placeholder.
    pub inserted: Vec<String>,
    /// Keys whose value, after repair, is still a placeholder.
    pub untranslated: Vec<String>,
    /// Keys present but not expected.
    pub extraneous: Vec<String>,
    /// Keys whose value is not a string. Left untouched.
    pub non_string: Vec<String>,
    changed: bool,
}

impl Reconciliation {
    /// Whether `repaired` differs from the input mapping.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

pub fn reconcile(
    lang: &str,
    expected: &ExpectedKeys,
    existing: &TranslationMap,
) -> Reconciliation {
    let found: BTreeSet<&str> = existing
        .keys()
        .map(String::as_str)
        .filter(|key| !is_reserved_key(key))
        .collect();
    let wanted: BTreeSet<&str> = expected
        .mandatory
        .iter()
        .chain(expected.optional.iter())
        .map(String::as_str)
        .collect();

    let mut repaired = existing.clone();
    repaired.insert(LANG_KEY.to_string(), Value::String(lang.to_string()));

    let mut inserted = Vec::new();
    let mut extraneous = Vec::new();
    for key in wanted.symmetric_difference(&found) {
        if expected.mandatory.contains(*key) {
            repaired.insert(key.to_string(), Value::String(placeholder(key)));
            inserted.push(key.to_string());
        } else if expected.optional.contains(*key) {
            continue;
        } else {
            extraneous.push(key.to_string());
        }
    }

    let mut untranslated = Vec::new();
    let mut non_string = Vec::new();
    for (key, value) in &repaired {
        match value {
            Value::String(text) if text.starts_with(PLACEHOLDER_PREFIX) => {
                untranslated.push(key.clone())
            }
            Value::String(_) => {}
            _ => non_string.push(key.clone()),
        }
    }

    let changed = &repaired != existing;
    Reconciliation {
        repaired,
        inserted,
        untranslated,
        extraneous,
        non_string,
        changed,
    }
}

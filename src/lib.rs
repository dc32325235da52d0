// SPDX-License-Identifier: PMPL-1.0-or-later

//! model-sync — keeps model datasets, their schemas and their translation
//! files in agreement.
//!
//! For every model directory under a root, the engine:
//! 1. validates the model's JSON schema against the draft-04 meta-schema;
//! 2. validates each entry against that schema and derives its primary key;
//! 3. derives the translation keys every entry needs in every language and
//!    repairs each language file by inserting `[TOTRANSLATE:<key>]`
//!    placeholders for missing mandatory keys, reporting untranslated and
//!    extraneous keys without ever deleting one.
//!
//! Models are processed concurrently and independently: one broken model
//! fails the run but never stops the others from being checked.

pub mod config;
pub mod coordinator;
pub mod dataset;
pub mod error;
pub mod keys;
pub mod lang;
pub mod reconcile;
pub mod registry;
pub mod report;
pub mod schema;
pub mod sync;
pub mod translation;
pub mod types;

pub use config::SyncConfig;
pub use coordinator::{discover_models, run};
pub use error::SyncError;
pub use types::{ModelReport, ModelStatus, RunReport};

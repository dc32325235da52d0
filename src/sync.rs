// SPDX-License-Identifier: PMPL-1.0-or-later

//! Model synchronizer: runs the pipeline for a single model.
//!
//! Stages, in order:
//! `read_schema → validate_schema → read_entries → build_registry →
//! [per language: read → reconcile → write or report]`.
//! The first failing stage ends the model with [`ModelStatus::Failed`]; the
//! error never propagates to other models.

use crate::config::SyncConfig;
use crate::dataset;
use crate::error::SyncError;
use crate::keys::{ExpectedKeys, I18nKeyBuilder};
use crate::reconcile::reconcile;
use crate::registry::EntryRegistry;
use crate::schema::{ModelSchema, SchemaExtensions, SchemaValidator};
use crate::translation;
use crate::types::{LanguageReport, ModelReport, ModelStatus};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info, info_span, warn};

/// Models whose name starts with this are experimental and never processed.
pub const EXPERIMENTAL_PREFIX: char = '_';

pub fn is_experimental(model: &str) -> bool {
    model.starts_with(EXPERIMENTAL_PREFIX)
}

pub struct ModelSynchronizer<'a> {
    config: &'a SyncConfig,
    validator: &'a SchemaValidator,
}

impl<'a> ModelSynchronizer<'a> {
    pub fn new(config: &'a SyncConfig, validator: &'a SchemaValidator) -> Self {
        Self { config, validator }
    }

    pub fn sync(&self, model: &str) -> ModelReport {
        let span = info_span!("model", name = model);
        let _guard = span.enter();

        if is_experimental(model) {
            info!("skipping experimental model");
            return ModelReport::skipped(model, "experimental model, not ready yet");
        }

        let mut report = ModelReport::new(model);
        if let Err(err) = self.run_stages(model, &mut report) {
            warn!(error = %err, "model failed");
            if let SyncError::Registry(registry) = &err {
                report.bad_entries = registry.bad_entries.clone();
                report.duplicates = registry.duplicates.clone();
            }
            if let SyncError::SchemaMeta { violations, .. } = &err {
                report.schema_violations = violations.clone();
            }
            report.status = ModelStatus::Failed(err.to_string());
        } else if let Some(failed) = report.languages.iter().find(|l| l.failed()) {
            report.status = ModelStatus::Failed(format!(
                "language \"{}\": {}",
                failed.lang,
                failed.error.as_deref().unwrap_or_default()
            ));
        }
        report
    }

    fn run_stages(&self, model: &str, report: &mut ModelReport) -> Result<(), SyncError> {
        let schema_path = self.config.schema_path(model);
        debug!(path = %schema_path.display(), "reading schema");
        let document = dataset::read_schema(&schema_path)?;

        debug!("validating schema");
        let schema = ModelSchema::from_document(&schema_path, &document, self.validator)?;

        let model_dir = self.config.model_dir(model);
        let data_path = dataset::find_data_file(&model_dir, &self.config.data_file_candidates())?;
        debug!(path = %data_path.display(), "reading entries");
        let entries = dataset::read_entries(&data_path)?;
        report.entry_count = entries.len();

        self.ensure_dir(&self.config.migrations_dir(model))?;

        let registry = EntryRegistry::build(model, &schema, entries)?;
        report.indexed_count = registry.len();
        info!(entries = registry.len(), "entries valid");

        if !self.config.i18n {
            debug!("i18n reconciliation disabled");
            return Ok(());
        }

        self.ensure_dir(&self.config.i18n_dir(model))?;
        report.languages = self
            .config
            .langs
            .par_iter()
            .map(|lang| self.sync_language(model, lang, &schema.extensions, &registry))
            .collect();
        Ok(())
    }

    fn sync_language(
        &self,
        model: &str,
        lang: &str,
        extensions: &SchemaExtensions,
        registry: &EntryRegistry,
    ) -> LanguageReport {
        let path = self.config.translation_path(model, lang);
        let builder = I18nKeyBuilder::new(model, extensions, lang);

        let mut report = LanguageReport {
            lang: lang.to_string(),
            path: path.clone(),
            ..LanguageReport::default()
        };

        if let Err(err) = self.reconcile_language(lang, &path, &builder, registry, &mut report) {
            warn!(lang, error = %err, "translation file failed");
            report.error = Some(err.to_string());
        }
        report
    }

    fn reconcile_language(
        &self,
        lang: &str,
        path: &Path,
        builder: &I18nKeyBuilder,
        registry: &EntryRegistry,
        report: &mut LanguageReport,
    ) -> Result<(), SyncError> {
        let expected = ExpectedKeys::collect(builder, registry.entries())?;
        report.expected_mandatory = expected.mandatory.len();
        report.expected_optional = expected.optional.len();

        let existing = translation::read_translation_file(path)?;
        let result = reconcile(lang, &expected, &existing);

        if !result.untranslated.is_empty() {
            warn!(lang, count = result.untranslated.len(), "untranslated keys");
        }
        if !result.extraneous.is_empty() {
            warn!(lang, count = result.extraneous.len(), "extraneous keys");
        }
        for key in &result.non_string {
            warn!(lang, key = key.as_str(), "value is not a string");
        }

        // Unchanged mappings still go through the writer to normalize key order.
        report.changed = result.changed();
        if !self.config.dry_run {
            report.written = translation::write_translation_file(path, &result.repaired)?;
            if report.written {
                info!(lang, path = %path.display(), "translation file written");
            }
        } else if report.changed {
            info!(
                lang,
                inserted = result.inserted.len(),
                "dry run, would update translation file"
            );
        }

        report.inserted = result.inserted;
        report.untranslated = result.untranslated;
        report.extraneous = result.extraneous;
        report.non_string = result.non_string;
        Ok(())
    }

    fn ensure_dir(&self, dir: &Path) -> Result<(), SyncError> {
        if self.config.dry_run || dir.is_dir() {
            return Ok(());
        }
        debug!(path = %dir.display(), "creating directory");
        fs::create_dir_all(dir).map_err(|e| SyncError::write(dir, e))
    }
}

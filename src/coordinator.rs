// SPDX-License-Identifier: PMPL-1.0-or-later

//! Run coordinator: discovers every model under the configured root and
//! synchronizes them concurrently.
//!
//! Models share no mutable state. Each one produces its own [`ModelReport`]
//! and a failing model never stops the others.

use crate::config::SyncConfig;
use crate::schema::SchemaValidator;
use crate::sync::ModelSynchronizer;
use crate::types::{ModelReport, RunReport};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Names of all model directories directly under `root`, sorted.
pub fn discover_models(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut models = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("listing {}", root.display()))?;
        if entry.file_type().is_dir() {
            models.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    models.sort();
    Ok(models)
}

/// Synchronize every model under the configured root.
pub fn run(config: &SyncConfig) -> Result<RunReport> {
    config.validate()?;
    let models = discover_models(&config.models_root)?;
    info!(count = models.len(), root = %config.models_root.display(), "models discovered");
    run_models(config, &models)
}

/// Synchronize an explicit list of models.
pub fn run_models(config: &SyncConfig, models: &[String]) -> Result<RunReport> {
    let validator = SchemaValidator::new()?;
    let synchronizer = ModelSynchronizer::new(config, &validator);

    let sync_all = || -> Vec<ModelReport> {
        models
            .par_iter()
            .map(|model| synchronizer.sync(model))
            .collect()
    };
    let results = match config.jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("building worker pool")?
            .install(sync_all),
        None => sync_all(),
    };

    Ok(RunReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        root: config.models_root.clone(),
        dry_run: config.dry_run,
        i18n: config.i18n,
        models: results,
    })
}

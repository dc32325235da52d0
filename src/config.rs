// SPDX-License-Identifier: PMPL-1.0-or-later

//! Run configuration: where the models live, which languages to reconcile,
//! and which stages to run.

use crate::lang;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Data file names tried, in order, when none is configured.
pub const DEFAULT_DATA_FILES: &[&str] = &["data.json", "data.yaml", "data.yml"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Directory holding one sub-directory per model.
    pub models_root: PathBuf,
    pub langs: Vec<String>,
    pub i18n_subdir: String,
    pub migrations_subdir: String,
    pub schema_file: String,
    /// Explicit data file name; looked up from [`DEFAULT_DATA_FILES`] when unset.
    pub data_file: Option<String>,
    /// Compute everything, write nothing.
    pub dry_run: bool,
    /// Run translation reconciliation. When off only schema and entries are checked.
    pub i18n: bool,
    /// Worker threads; defaults to the number of CPUs.
    pub jobs: Option<usize>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            models_root: PathBuf::from("data"),
            langs: vec!["en".to_string(), "fr".to_string()],
            i18n_subdir: "i18n".to_string(),
            migrations_subdir: "migrations".to_string(),
            schema_file: "schema.json".to_string(),
            data_file: None,
            dry_run: false,
            i18n: true,
            jobs: None,
        }
    }
}

impl SyncConfig {
    /// Load a configuration file. The format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: SyncConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json config {}", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml config {}", path.display()))?,
            _ => return Err(anyhow!("unsupported config extension for {}", path.display())),
        };

        // Relative roots are relative to the config file, not the working directory.
        let config = match path.parent() {
            Some(base) if config.models_root.is_relative() => SyncConfig {
                models_root: base.join(&config.models_root),
                ..config
            },
            _ => config,
        };
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.langs.is_empty() {
            bail!("at least one language must be configured");
        }
        let mut seen = HashSet::new();
        for tag in &self.langs {
            if !lang::is_valid_tag(tag) {
                bail!(
                    "invalid language tag \"{}\" (expected e.g. \"en\", \"pt-BR\" or \"es-419\")",
                    tag
                );
            }
            if !seen.insert(tag.as_str()) {
                bail!("language \"{}\" is configured twice", tag);
            }
        }
        if self.jobs == Some(0) {
            bail!("jobs must be at least 1");
        }
        for (label, name) in [
            ("i18n_subdir", &self.i18n_subdir),
            ("migrations_subdir", &self.migrations_subdir),
            ("schema_file", &self.schema_file),
        ] {
            check_plain_name(label, name)?;
        }
        if let Some(name) = &self.data_file {
            check_plain_name("data_file", name)?;
        }
        Ok(())
    }

    pub fn model_dir(&self, model: &str) -> PathBuf {
        self.models_root.join(model)
    }

    pub fn schema_path(&self, model: &str) -> PathBuf {
        self.model_dir(model).join(&self.schema_file)
    }

    pub fn i18n_dir(&self, model: &str) -> PathBuf {
        self.model_dir(model).join(&self.i18n_subdir)
    }

    pub fn migrations_dir(&self, model: &str) -> PathBuf {
        self.model_dir(model).join(&self.migrations_subdir)
    }

    pub fn translation_path(&self, model: &str, lang: &str) -> PathBuf {
        self.i18n_dir(model).join(format!("{}.json", lang))
    }

    /// Candidate data file names in lookup order.
    pub fn data_file_candidates(&self) -> Vec<String> {
        match &self.data_file {
            Some(name) => vec![name.clone()],
            None => DEFAULT_DATA_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn check_plain_name(label: &str, name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let plain = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if !plain {
        bail!("{} must be a plain file name, got \"{}\"", label, name);
    }
    Ok(())
}

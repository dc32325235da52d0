// SPDX-License-Identifier: PMPL-1.0-or-later

//! Console and JSON output for run reports

use crate::lang;
use crate::types::*;
use anyhow::Result;
use colored::*;
use std::fs;
use std::path::Path;

pub struct ReportFormatter {
    verbose: bool,
}

impl ReportFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print(&self, report: &RunReport) {
        println!("\n{}", "=== MODEL SYNC ===".bold().cyan());
        println!("  Root: {}", report.root.display());
        if report.dry_run {
            println!("  {}", "Dry run: no file was written".yellow());
        }
        if !report.i18n {
            println!("  Translation reconciliation disabled");
        }
        println!();

        for model in &report.models {
            self.print_model(model);
        }

        self.print_totals(report);
    }

    fn print_model(&self, model: &ModelReport) {
        let status = match &model.status {
            ModelStatus::Passed => "PASSED".green(),
            ModelStatus::Failed(_) => "FAILED".red(),
            ModelStatus::Skipped(_) => "SKIPPED".dimmed(),
        };
        println!("{} {}", status, model.name.bold());

        match &model.status {
            ModelStatus::Skipped(reason) => {
                println!("    {}", reason);
                return;
            }
            ModelStatus::Failed(reason)
                if model.bad_entries.is_empty() && model.duplicates.is_empty() =>
            {
                for line in reason.lines() {
                    println!("    {}", line.red());
                }
            }
            _ => {}
        }

        if !model.bad_entries.is_empty() {
            println!(
                "    Bad entries: {}",
                model.bad_entries.len().to_string().red().bold()
            );
            for bad in &model.bad_entries {
                println!("      - {}", bad);
                if self.verbose {
                    println!("        {}", bad.raw);
                }
            }
        }
        if !model.duplicates.is_empty() {
            println!(
                "    Duplicate primary keys: {}",
                model.duplicates.len().to_string().red().bold()
            );
            for duplicate in &model.duplicates {
                println!("      - {}", duplicate);
            }
        }

        if model.entry_count > 0 {
            println!(
                "    Entries: {} ({} indexed)",
                model.entry_count, model.indexed_count
            );
        }

        for language in &model.languages {
            self.print_language(language);
        }
    }

    fn print_language(&self, language: &LanguageReport) {
        let name = lang::language_name(&language.lang)
            .map(|n| format!("{} ({})", language.lang, n))
            .unwrap_or_else(|| language.lang.clone());

        if let Some(err) = &language.error {
            println!("    {} {}", name, err.red());
            return;
        }

        let action = if language.written {
            "updated".green()
        } else if language.changed {
            "would update".yellow()
        } else {
            "up to date".normal()
        };
        println!(
            "    {}: {} mandatory, {} optional keys, {}",
            name, language.expected_mandatory, language.expected_optional, action
        );
        print_keys("inserted placeholder", &language.inserted, |s| s.normal());
        print_keys("untranslated", &language.untranslated, |s| s.yellow());
        print_keys("extraneous", &language.extraneous, |s| s.magenta());
        print_keys("non-string value", &language.non_string, |s| s.red());
    }

    fn print_totals(&self, report: &RunReport) {
        println!();
        println!(
            "Models: {} passed, {} failed, {} skipped",
            report.passed().to_string().green(),
            report.failed().to_string().red(),
            report.skipped()
        );
        let untranslated: usize = report.models.iter().map(|m| m.untranslated_count()).sum();
        let extraneous: usize = report.models.iter().map(|m| m.extraneous_count()).sum();
        if untranslated > 0 || extraneous > 0 {
            println!(
                "Translations: {} untranslated, {} extraneous",
                untranslated, extraneous
            );
        }
        if report.succeeded() {
            println!("{}", "All done".green().bold());
        } else {
            println!("{}", "Synchronization failed".red().bold());
        }
    }
}

fn print_keys(label: &str, keys: &[String], paint: impl Fn(&str) -> ColoredString) {
    if keys.is_empty() {
        return;
    }
    println!("      {} ({}):", label, keys.len());
    for key in keys {
        println!("        - {}", paint(key));
    }
}

/// Print a run report to the console
pub fn print_report(report: &RunReport, verbose: bool) {
    ReportFormatter::new(verbose).print(report);
}

/// Write the run report as JSON
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

// SPDX-License-Identifier: PMPL-1.0-or-later

//! model-sync: validate model datasets and synchronize their translation files

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use model_sync::config::SyncConfig;
use model_sync::{coordinator, report, sync};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "model-sync")]
#[command(version)]
#[command(about = "Validate model datasets against their schemas and sync translation files")]
#[command(long_about = None)]
struct Cli {
    /// Verbose output (debug logging, raw bad entries)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every model and reconcile its translation files
    Sync {
        #[command(flatten)]
        source: SourceArgs,

        /// Languages to reconcile (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        lang: Option<Vec<String>>,

        /// Compute and report everything, write nothing
        #[arg(long)]
        dry_run: bool,

        /// Skip translation reconciliation, only validate schemas and entries
        #[arg(long)]
        no_i18n: bool,

        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Write the run report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the models found under the root
    List {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Directory containing one sub-directory per model
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Configuration file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl SourceArgs {
    fn load(&self) -> Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::load(path)?,
            None => SyncConfig::default(),
        };
        if let Some(root) = &self.root {
            config.models_root = root.clone();
        }
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Sync {
            source,
            lang,
            dry_run,
            no_i18n,
            jobs,
            output,
        } => {
            let mut config = source.load()?;
            if let Some(langs) = lang {
                config.langs = langs;
            }
            config.dry_run |= dry_run;
            config.i18n &= !no_i18n;
            if jobs.is_some() {
                config.jobs = jobs;
            }

            println!("Synchronizing models in: {}", config.models_root.display());
            let run_report = coordinator::run(&config)?;
            report::print_report(&run_report, cli.verbose);

            if let Some(output_path) = output {
                report::write_report(&run_report, &output_path)?;
                println!("Report saved to: {}", output_path.display());
            }

            if !run_report.succeeded() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::List { source } => {
            let config = source.load()?;
            let models = coordinator::discover_models(&config.models_root)?;
            if models.is_empty() {
                println!("No models in {}", config.models_root.display());
            }
            for model in &models {
                if sync::is_experimental(model) {
                    println!("  {} {}", model, "(experimental, skipped)".dimmed());
                } else {
                    println!("  {}", model);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

//! rulesets — inspect and resolve a rule-set catalog.
//!
//! Prints resolved rule mappings as JSON for the external validation engine
//! or for debugging composition.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rulesets::Catalog;
use rulesets_core::config::{load_dotenv, Config, LogConfig};

// ── CLI ─────────────────────────────────────────────────────────────

/// Resolve composable validation rule sets from a YAML catalog.
#[derive(Parser, Debug)]
#[command(name = "rulesets", version, about)]
struct Cli {
    /// Path to the catalog YAML file (defaults to the configured catalog).
    #[arg(long, env = "RULESETS_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List rule set ids with their resolved field counts.
    List,

    /// Print the resolved rules of one rule set as JSON.
    Resolve {
        /// Rule set id.
        id: String,

        /// Extra source to inject, as YAML: a rule set id or an inline
        /// mapping such as `{name: "required|string"}`. Repeatable.
        #[arg(long = "with", value_name = "YAML")]
        with: Vec<String>,
    },

    /// Resolve every rule set and report failures.
    Check,
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    load_dotenv();
    let config = Config::from_env();
    init_tracing(&config.log);

    let cli = Cli::parse();
    config.log_summary();

    let path = cli.catalog.unwrap_or_else(|| config.catalog.path.clone());
    let catalog = Catalog::from_file(&path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;

    match cli.command {
        Commands::List => {
            for id in catalog.ids() {
                let fields = match catalog.resolve(id) {
                    Ok(rules) => rules.len().to_string(),
                    Err(e) => format!("error: {e}"),
                };
                match catalog.description(id) {
                    Some(description) => println!("{id}\t{fields}\t{description}"),
                    None => println!("{id}\t{fields}"),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve { id, with } => {
            let rules = if with.is_empty() {
                catalog.resolve(&id)?
            } else {
                let extra = with
                    .iter()
                    .map(|raw| {
                        serde_yaml::from_str(raw)
                            .with_context(|| format!("invalid --with source: {raw}"))
                    })
                    .collect::<anyhow::Result<Vec<serde_yaml::Value>>>()?;
                catalog.combine(&id, &extra)?
            };
            println!("{}", serde_json::to_string_pretty(&rules)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let results = catalog.resolve_all();
            let failed = results.values().filter(|r| r.is_err()).count();
            for (id, result) in &results {
                if let Err(e) = result {
                    error!(rule_set = %id, error = %e, "rule set failed to resolve");
                }
            }
            info!(rule_sets = results.len(), failed, "catalog check complete");
            Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log.filter));

    // Logs go to stderr so JSON output on stdout stays clean.
    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

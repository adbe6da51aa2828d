use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::{Result, eyre::WrapErr, eyre::eyre};
use serde::Serialize;
use tracing::{debug, warn};

use filterdeck::action::Action;
use filterdeck::config::Config;
use filterdeck::core::{FilterFieldRegistry, ViewKey};
use filterdeck::services::{SessionSummary, ViewSession};

/// Inspect view catalogs and replay filter/column commands against a view
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum, global = true)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalogued views
    Views,
    /// Print a view's filter fields as JSON
    Fields { view: String },
    /// Print a view's columns and default visibility as JSON
    Columns { view: String },
    /// Apply a JSON array of actions to a fresh session and print the result
    Replay {
        view: String,
        script: PathBuf,
        /// JSON array of rows (column key -> cell text) to run the final filters over
        #[arg(long = "rows", value_name = "PATH")]
        rows: Option<PathBuf>,
        /// Record rejected actions and continue instead of stopping
        #[arg(long = "keep-going")]
        keep_going: bool,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel { Error, Warn, Info, Debug, Trace }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewListing {
    view: ViewKey,
    fields: usize,
    default_visible: usize,
    columns: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StepResult {
    index: usize,
    action: String,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayReport {
    steps: Vec<StepResult>,
    session: SessionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    matching_rows: Option<Vec<usize>>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let cwd = std::env::current_dir()?;
    let log_path = cwd.join(filterdeck::logging::LOG_FILE.clone());
    let level = match args.logging {
        Some(LogLevel::Error) => Some(tracing::Level::ERROR),
        Some(LogLevel::Warn)  => Some(tracing::Level::WARN),
        Some(LogLevel::Info)  => Some(tracing::Level::INFO),
        Some(LogLevel::Debug) => Some(tracing::Level::DEBUG),
        Some(LogLevel::Trace) => Some(tracing::Level::TRACE),
        None => None,
    };
    if level.is_some() {
        filterdeck::logging::init_with(Some(log_path), level)?;
    }

    let cfg = Config::from_path(args.config.as_ref())?;
    let registry = Arc::new(cfg.load_registry()?);

    match args.command {
        Command::Views => {
            let listing: Vec<ViewListing> = registry
                .views()
                .map(|view| ViewListing {
                    view: view.clone(),
                    fields: registry.get_fields(view).len(),
                    default_visible: registry.default_visible(view).len(),
                    columns: registry.columns(view).len(),
                })
                .collect();
            print_json(&listing)
        }
        Command::Fields { view } => {
            let view = known_view(&registry, &view)?;
            print_json(&registry.get_fields(&view))
        }
        Command::Columns { view } => {
            let view = known_view(&registry, &view)?;
            let session = ViewSession::open(registry.clone(), view);
            print_json(&session.columns().columns())
        }
        Command::Replay { view, script, rows, keep_going } => {
            let view = known_view(&registry, &view)?;
            let report = replay(registry, view, &script, rows.as_deref(), keep_going)?;
            print_json(&report)
        }
    }
}

fn known_view(registry: &FilterFieldRegistry, view: &str) -> Result<ViewKey> {
    let key = ViewKey::from(view);
    if registry.contains_view(&key) {
        Ok(key)
    } else {
        let known: Vec<&str> = registry.views().map(|v| v.as_str()).collect();
        Err(eyre!("unknown view '{view}' (known: {})", known.join(", ")))
    }
}

fn replay(
    registry: Arc<FilterFieldRegistry>,
    view: ViewKey,
    script: &Path,
    rows: Option<&Path>,
    keep_going: bool,
) -> Result<ReplayReport> {
    let body = fs::read_to_string(script)
        .wrap_err_with(|| format!("failed to read script {}", script.display()))?;
    let actions: Vec<Action> = serde_json::from_str(&body)
        .wrap_err_with(|| format!("invalid action script {}", script.display()))?;
    debug!("Replaying {} actions against view '{}'", actions.len(), view);

    let mut session = ViewSession::open(registry, view);
    let mut steps = Vec::with_capacity(actions.len());
    for (index, action) in actions.into_iter().enumerate() {
        let name = action.to_string();
        match session.handle_action(action) {
            Ok(changed) => steps.push(StepResult { index, action: name, changed, error: None }),
            Err(e) if keep_going => {
                warn!("Step {index} ({name}) rejected: {e}");
                steps.push(StepResult { index, action: name, changed: false, error: Some(e.to_string()) });
            }
            Err(e) => return Err(e.wrap_err(format!("step {index} ({name}) rejected"))),
        }
    }

    let matching_rows = match rows {
        Some(path) => {
            let body = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read rows {}", path.display()))?;
            let rows: Vec<BTreeMap<String, String>> = serde_json::from_str(&body)
                .wrap_err_with(|| format!("invalid rows file {}", path.display()))?;
            Some(session.predicate().filter_rows(&rows))
        }
        None => None,
    };

    Ok(ReplayReport {
        steps,
        session: session.summary(),
        matching_rows,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Roster CLI - binary entry point.
//!
//! ```text
//! main() -> RosterConfig::load() -> init_tracing() -> FileStorage::open()
//!        -> Interpreter -> run_shell(stdin, stdout, stderr)
//! ```
//!
//! The prompt is shown only when stdin is a terminal, so piped scripts produce
//! clean output.

use std::{
    fs::{self, OpenOptions},
    io::{self, IsTerminal},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use roster_config::RosterConfig;
use roster_engine::{Interpreter, run_shell};
use roster_store::FileStorage;

fn init_tracing(config: Option<&RosterConfig>, mut init_warnings: Vec<String>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let log_file = open_roster_log_file(config, &mut init_warnings);

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Console output is the product; without a log file, log nothing.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_roster_log_file(
    config: Option<&RosterConfig>,
    warnings: &mut Vec<String>,
) -> Option<(PathBuf, fs::File)> {
    for candidate in roster_log_file_candidates(config) {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return Some((candidate, file)),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    None
}

fn roster_log_file_candidates(config: Option<&RosterConfig>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(dir) = RosterConfig::log_dir(config) {
        candidates.push(dir.join("roster.log"));
    }

    // Default: ~/.roster/logs/roster.log
    if let Some(home) = roster_config::roster_home() {
        candidates.push(home.join("logs").join("roster.log"));
    }

    // Fallback: ./.roster/logs/roster.log
    candidates.push(PathBuf::from(".roster").join("logs").join("roster.log"));

    candidates
}

fn main() -> Result<()> {
    let mut init_warnings = Vec::new();
    let config = match RosterConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_warnings.push(format!("Ignoring config: {e}"));
            None
        }
    };

    init_tracing(config.as_ref(), init_warnings);

    let store_path = RosterConfig::store_path(config.as_ref());
    let mut storage = FileStorage::open(&store_path)
        .with_context(|| format!("failed to load object store {}", store_path.display()))?;
    tracing::info!(
        path = %store_path.display(),
        records = storage.len(),
        "Object store ready"
    );

    let stdin = io::stdin();
    let prompt = stdin
        .is_terminal()
        .then(|| RosterConfig::prompt(config.as_ref()));

    let mut interpreter = Interpreter::new(&mut storage);
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    run_shell(
        &mut interpreter,
        stdin.lock(),
        &mut stdout,
        &mut stderr,
        prompt.as_deref(),
    )
    .context("console I/O failed")?;

    tracing::info!("Console closed");
    Ok(())
}

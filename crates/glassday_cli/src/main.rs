//! Terminal entry point for a Glassday session.
//!
//! # Responsibility
//! - Resolve configuration from `GLASSDAY_*` env and command-line flags.
//! - Open today's session over SQLite and hand it to the line loop.
//!
//! # Invariants
//! - A logging failure never prevents the planner from running.

mod app;
mod commands;
mod render;

use clap::Parser;
use glassday_core::{init_from_config, open_session, AppConfig, LogLevel};
use log::error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "glassday", version, about = "Sort today into glass and rubber balls")]
struct Cli {
    /// SQLite database file (default: ./glassday.sqlite3)
    #[arg(long)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("glassday: {message}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = init_from_config(&config) {
        eprintln!("glassday: logging disabled: {err}");
    }

    let mut session = match open_session(&config) {
        Ok(session) => session,
        Err(err) => {
            error!("event=session_open module=cli status=error error={err}");
            eprintln!("glassday: cannot open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match app::run(&mut session, &mut stdin.lock(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("glassday: {err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: Cli) -> Result<AppConfig, String> {
    let mut config = AppConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = LogLevel::parse(&level).map_err(|err| err.to_string())?;
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

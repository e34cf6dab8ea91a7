//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `notedeck_core` linkage.
//! - Optionally open a slot database and print collection counts.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `notedeck [DB_PATH [LOG_DIR]]`. Settings come from
//! `NOTEDECK_CONFIG` / `NOTEDECK_*` variables; `DB_PATH` overrides the
//! configured database.

use notedeck_core::db::open_db;
use notedeck_core::{init_logging, CoreConfig, SqliteKvRepository, Workspace};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("notedeck_core ping={}", notedeck_core::ping());
    println!("notedeck_core version={}", notedeck_core::core_version());

    let mut args = std::env::args().skip(1);
    // Open the database only when asked; a bare run stays side-effect free.
    let Some(db_arg) = args.next() else {
        return ExitCode::SUCCESS;
    };

    let mut config = match CoreConfig::resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("notedeck config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    config.db_path = PathBuf::from(db_arg);

    if let Some(log_dir) = args.next() {
        if let Err(err) = init_logging(&config.log_level, &log_dir) {
            eprintln!("notedeck logging disabled: {err}");
        }
    }

    match print_summary(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("notedeck summary failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(config: &CoreConfig) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let kv = SqliteKvRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let workspace = Workspace::open(&kv, &config.keys);
    let stats = workspace.tasks.board("").stats;

    println!("db={}", config.db_path.display());
    println!("notes={}", workspace.notes.len());
    println!(
        "tasks={} pending={} completed={} progress={}%",
        stats.total, stats.pending, stats.completed, stats.progress_percent
    );
    Ok(())
}

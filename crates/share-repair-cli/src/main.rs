mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::process;

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::Cli;
use dotenv::dotenv;
use progress::CliReporter;
use share_repair_core::command::{self, CommandOptions, CommandStatus};
use share_repair_core::{Database, DbFileSpace, ReconciliationRunner, RunMode};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let guard = logging::init_logger();

    let args = Cli::parse();

    let status = run(&args);
    // flush the file log before a non-zero exit skips destructors
    drop(guard);

    let status = status?;
    if status != CommandStatus::Completed {
        process::exit(status.exit_code());
    }
    Ok(())
}

fn run(args: &Cli) -> anyhow::Result<CommandStatus> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // an unknown type must not open (and so create) the database
    let scope = match command::parse_scope(&args.issue_type, &mut out)? {
        Some(scope) => scope,
        None => return Ok(CommandStatus::UsageError),
    };

    let mut config = share_repair_core::config::load_configuration()
        .context("Error loading configuration")?;
    if let Some(path) = &args.db {
        config.database_path = path.clone();
    }

    let options = CommandOptions {
        mode: RunMode::from_fix_flag(args.fix),
        verbose: args.verbose,
        json: args.json,
    };

    info!(
        "Opening {} ({})",
        config.database_path,
        if args.fix { "fix".yellow() } else { "report only".green() }
    );
    let db = Database::open(&config.database_path)
        .with_context(|| format!("Error opening database {}", config.database_path))?;
    let files = DbFileSpace::new(&db, &config.storage_prefixes);
    let reporter = CliReporter::new();
    let runner =
        ReconciliationRunner::new(&db, &files, &config.storage_prefixes).with_progress(&reporter);

    let (report, status) = command::execute(scope, options, &runner, &mut out)?;
    out.flush()?;

    match status {
        CommandStatus::Aborted => error!(
            "Run aborted after repairing {} of {} records",
            format!("{}", report.total_repaired()).red(),
            format!("{}", report.total_found()).red(),
        ),
        _ => info!(
            "{} records found, {} repaired",
            format!("{}", report.total_found()).cyan(),
            format!("{}", report.total_repaired()).green(),
        ),
    }

    Ok(status)
}

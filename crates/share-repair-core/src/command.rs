//! The `share-repair` command: argument semantics and report output, kept
//! apart from argument parsing so it can be driven with any writer.

use std::io::Write;

use crate::error::Error;
use crate::filespace::FileSpace;
use crate::report::ReconciliationReport;
use crate::runner::{ReconciliationRunner, RunMode, Scope};
use crate::storage::ShareRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    pub mode: RunMode,
    /// Print one line per affected record before the counts.
    pub verbose: bool,
    pub json: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::ReportOnly,
            verbose: false,
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    /// The type argument was not recognised; nothing was read or changed.
    UsageError,
    /// A pass failed part way; the printed report holds the partial counts.
    Aborted,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Completed => 0,
            CommandStatus::UsageError => 1,
            CommandStatus::Aborted => 2,
        }
    }
}

/// Parse the `type` argument. When it is not recognised, the error is
/// written to `out` and `None` is returned; callers must not open the store.
pub fn parse_scope<W: Write + ?Sized>(type_arg: &str, out: &mut W) -> Result<Option<Scope>, Error> {
    match type_arg.parse::<Scope>() {
        Ok(scope) => Ok(Some(scope)),
        Err(e @ Error::UnrecognisedScope(_)) => {
            writeln!(out, "{}", e)?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Run the selected passes and print the report, also when a pass aborts.
pub fn execute<R, F, W>(
    scope: Scope,
    options: CommandOptions,
    runner: &ReconciliationRunner<'_, R, F>,
    out: &mut W,
) -> Result<(ReconciliationReport, CommandStatus), Error>
where
    R: ShareRepository + ?Sized,
    F: FileSpace,
    W: Write + ?Sized,
{
    let mut report = ReconciliationReport::new(scope, options.mode);
    let status = match runner.run(scope, options.mode, &mut report) {
        Ok(()) => CommandStatus::Completed,
        Err(_) => CommandStatus::Aborted,
    };
    write_report(&report, options, out)?;
    Ok((report, status))
}

/// Run from the raw `type` argument, as the command line does. An
/// unrecognised type prints the allowed values and never reaches the runner.
pub fn execute_type<R, F, W>(
    type_arg: &str,
    options: CommandOptions,
    runner: &ReconciliationRunner<'_, R, F>,
    out: &mut W,
) -> Result<CommandStatus, Error>
where
    R: ShareRepository + ?Sized,
    F: FileSpace,
    W: Write + ?Sized,
{
    match parse_scope(type_arg, out)? {
        Some(scope) => Ok(execute(scope, options, runner, out)?.1),
        None => Ok(CommandStatus::UsageError),
    }
}

pub fn write_report<W: Write + ?Sized>(
    report: &ReconciliationReport,
    options: CommandOptions,
    out: &mut W,
) -> Result<(), Error> {
    if options.json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        return Ok(());
    }

    if options.verbose {
        for line in report.annotations() {
            writeln!(out, "{}", line)?;
        }
    }
    writeln!(out, "{}", report)?;
    Ok(())
}

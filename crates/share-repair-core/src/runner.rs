use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

use crate::error::Error;
use crate::filespace::FileSpace;
use crate::progress::{ProgressReporter, SilentReporter};
use crate::reconcile::{reconcile_initiators, reconcile_owners};
use crate::report::{PassKind, ReconciliationReport};
use crate::storage::ShareRepository;

/// Which passes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    All,
    InvalidOwner,
    InvalidInitiator,
}

impl Scope {
    pub const ALLOWED: &'static str = "all|invalid-owner|invalid-initiator";

    pub fn includes(self, kind: PassKind) -> bool {
        matches!(
            (self, kind),
            (Scope::All, _)
                | (Scope::InvalidOwner, PassKind::InvalidOwner)
                | (Scope::InvalidInitiator, PassKind::InvalidInitiator)
        )
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Scope::All),
            "invalid-owner" => Ok(Scope::InvalidOwner),
            "invalid-initiator" => Ok(Scope::InvalidInitiator),
            other => Err(Error::UnrecognisedScope(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::All => "all",
            Scope::InvalidOwner => "invalid-owner",
            Scope::InvalidInitiator => "invalid-initiator",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Count what would change, mutate nothing.
    ReportOnly,
    Fix,
}

impl RunMode {
    pub fn from_fix_flag(fix: bool) -> Self {
        if fix {
            RunMode::Fix
        } else {
            RunMode::ReportOnly
        }
    }
}

/// Runs the owner and initiator passes against a share store and a file
/// space.
pub struct ReconciliationRunner<'a, R: ?Sized, F> {
    repo: &'a R,
    files: &'a F,
    storage_prefixes: Vec<String>,
    progress: &'a dyn ProgressReporter,
}

impl<'a, R, F> ReconciliationRunner<'a, R, F>
where
    R: ShareRepository + ?Sized,
    F: FileSpace,
{
    pub fn new(repo: &'a R, files: &'a F, storage_prefixes: &[String]) -> Self {
        Self {
            repo,
            files,
            storage_prefixes: storage_prefixes.to_vec(),
            progress: &SilentReporter,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Run the passes selected by `scope`, owner pass first, filling in
    /// `report` as it goes. On error the report keeps the counts reached so
    /// far, records the abort reason, and later passes do not run.
    pub fn run(
        &self,
        scope: Scope,
        mode: RunMode,
        report: &mut ReconciliationReport,
    ) -> Result<(), Error> {
        info!("Reconciling shares (type: {}, mode: {:?})", scope, mode);

        for kind in [PassKind::InvalidOwner, PassKind::InvalidInitiator] {
            if !scope.includes(kind) {
                continue;
            }
            self.progress.on_pass_start(kind);
            let pass = report.begin_pass(kind);
            let result = match kind {
                PassKind::InvalidOwner => reconcile_owners(
                    self.repo,
                    &self.storage_prefixes,
                    mode,
                    pass,
                    self.progress,
                ),
                PassKind::InvalidInitiator => {
                    reconcile_initiators(self.repo, self.files, mode, pass, self.progress)
                }
            };
            self.progress.on_pass_complete(pass);

            if let Err(e) = result {
                error!("Aborting {} pass: {}", kind.subject(), e);
                report.aborted = Some(e.to_string());
                return Err(e);
            }
        }

        report.completed_at = Some(Utc::now());
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::runner::{RunMode, Scope};

/// Which reconciliation pass a [`PassReport`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    InvalidOwner,
    InvalidInitiator,
}

impl PassKind {
    /// Noun phrase used in the summary lines.
    pub fn subject(self) -> &'static str {
        match self {
            PassKind::InvalidOwner => "invalid share owners",
            PassKind::InvalidInitiator => "invalid initiator reshares",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub kind: PassKind,
    pub found: usize,
    pub repaired: usize,
    pub annotations: Vec<String>,
}

impl PassReport {
    pub fn new(kind: PassKind) -> Self {
        Self {
            kind,
            found: 0,
            repaired: 0,
            annotations: Vec::new(),
        }
    }

    pub fn note(&mut self, annotation: String) {
        self.annotations.push(annotation);
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} {}", self.found, self.kind.subject())?;
        write!(f, "Repaired {} {}", self.repaired, self.kind.subject())
    }
}

/// Outcome of one invocation. Passes appear in the order they ran.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub scope: Scope,
    pub mode: RunMode,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub passes: Vec<PassReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl ReconciliationReport {
    pub fn new(scope: Scope, mode: RunMode) -> Self {
        Self {
            scope,
            mode,
            started_at: Utc::now(),
            completed_at: None,
            passes: Vec::new(),
            aborted: None,
        }
    }

    pub fn pass(&self, kind: PassKind) -> Option<&PassReport> {
        self.passes.iter().find(|p| p.kind == kind)
    }

    /// Start a new pass and hand out its report for filling in.
    pub fn begin_pass(&mut self, kind: PassKind) -> &mut PassReport {
        self.passes.push(PassReport::new(kind));
        let last = self.passes.len() - 1;
        &mut self.passes[last]
    }

    pub fn total_found(&self) -> usize {
        self.passes.iter().map(|p| p.found).sum()
    }

    pub fn total_repaired(&self) -> usize {
        self.passes.iter().map(|p| p.repaired).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some() && self.aborted.is_none()
    }

    /// Per-record annotations of every pass, in order.
    pub fn annotations(&self) -> impl Iterator<Item = &str> {
        self.passes
            .iter()
            .flat_map(|p| p.annotations.iter().map(String::as_str))
    }
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pass) in self.passes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", pass)?;
        }
        if let Some(reason) = &self.aborted {
            if !self.passes.is_empty() {
                writeln!(f)?;
            }
            write!(f, "Aborted: {}", reason)?;
        }
        Ok(())
    }
}

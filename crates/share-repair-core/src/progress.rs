use crate::report::{PassKind, PassReport};

/// Trait for reporting reconciliation progress.
///
/// The CLI implements it with an indicatif spinner. All methods have default
/// no-op implementations.
pub trait ProgressReporter {
    fn on_pass_start(&self, _kind: PassKind) {}
    fn on_scan_source(&self, _kind: PassKind, _source: &str) {}
    fn on_record(&self, _kind: PassKind, _found: usize, _repaired: usize) {}
    fn on_pass_complete(&self, _report: &PassReport) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

use indicatif::{ProgressBar, ProgressStyle};
use share_repair_core::{PassKind, PassReport, ProgressReporter};
use std::cell::RefCell;
use std::time::Duration;

/// CLI progress reporter: one spinner per pass, on stderr.
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn set_message(&self, message: String) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(message);
        }
    }
}

impl Default for CliReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn pass_label(kind: PassKind) -> &'static str {
    match kind {
        PassKind::InvalidOwner => "Checking share owners",
        PassKind::InvalidInitiator => "Checking reshare initiators",
    }
}

impl ProgressReporter for CliReporter {
    fn on_pass_start(&self, kind: PassKind) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(format!("{}...", pass_label(kind)));
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn on_scan_source(&self, kind: PassKind, source: &str) {
        self.set_message(format!("{}... {}", pass_label(kind), source));
    }

    fn on_record(&self, kind: PassKind, found: usize, repaired: usize) {
        self.set_message(format!(
            "{}... repaired {}/{}",
            pass_label(kind),
            repaired,
            found
        ));
    }

    fn on_pass_complete(&self, _report: &PassReport) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

pub mod command;
pub mod config;
pub mod error;
pub mod filespace;
pub mod progress;
pub mod reconcile;
pub mod report;
pub mod runner;
pub mod storage;

pub use config::AppConfig;
pub use error::Error;
pub use filespace::{DbFileSpace, FileSpace, Node, UserFolder};
pub use progress::{ProgressReporter, SilentReporter};
pub use report::{PassKind, PassReport, ReconciliationReport};
pub use runner::{ReconciliationRunner, RunMode, Scope};
pub use storage::{Database, ShareRepository};

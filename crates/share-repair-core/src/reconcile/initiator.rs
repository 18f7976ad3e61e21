use tracing::{debug, info, warn};

use crate::error::Error;
use crate::filespace::{FileSpace, UserFolder};
use crate::progress::ProgressReporter;
use crate::report::{PassKind, PassReport};
use crate::runner::RunMode;
use crate::storage::models::ShareRecord;
use crate::storage::ShareRepository;

/// A re-share whose initiator can no longer reach the shared file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatorFix {
    pub share: ShareRecord,
}

impl InitiatorFix {
    /// The recorded owner takes over as initiator. It is not checked
    /// against the owner's file space.
    pub fn new_initiator(&self) -> &str {
        &self.share.uid_owner
    }

    pub fn describe(&self) -> String {
        format!(
            "reshare {}: file {} not found for {}, uid_initiator -> {}",
            self.share.id,
            self.share.file_source,
            self.share.uid_initiator,
            self.new_initiator()
        )
    }
}

/// Check every resharer's reshares against their file space. Read-only.
/// Users whose folder cannot be resolved are skipped, as are reshares whose
/// file sits in a looping file cache chain.
pub fn plan_initiator_fixes<R, F>(
    repo: &R,
    files: &F,
    progress: &dyn ProgressReporter,
) -> Result<Vec<InitiatorFix>, Error>
where
    R: ShareRepository + ?Sized,
    F: FileSpace + ?Sized,
{
    let mut fixes = Vec::new();

    for uid in repo.find_resharers()? {
        progress.on_scan_source(PassKind::InvalidInitiator, &uid);
        let folder = match files.user_folder(&uid) {
            Ok(folder) => folder,
            Err(e) => {
                warn!("Skipping reshares of {}: {}", uid, e);
                continue;
            }
        };

        let reshares = repo.find_reshares_for_user(&uid)?;
        debug!("{} reshares initiated by {}", reshares.len(), uid);

        for share in reshares {
            // trashed nodes still count as present
            let nodes = match folder.get_by_id(share.file_source, true) {
                Ok(nodes) => nodes,
                Err(e @ Error::FileCacheCycle(_)) => {
                    warn!("Skipping reshare {} of {}: {}", share.id, uid, e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if nodes.is_empty() {
                fixes.push(InitiatorFix { share });
            }
        }
    }

    Ok(fixes)
}

/// Find re-shares whose initiator lost the file and, in fix mode, hand them
/// to the recorded owner. Any failed mutation aborts the pass.
pub fn reconcile_initiators<R, F>(
    repo: &R,
    files: &F,
    mode: RunMode,
    report: &mut PassReport,
    progress: &dyn ProgressReporter,
) -> Result<(), Error>
where
    R: ShareRepository + ?Sized,
    F: FileSpace + ?Sized,
{
    let fixes = plan_initiator_fixes(repo, files, progress)?;
    report.found = fixes.len();
    for fix in &fixes {
        report.note(fix.describe());
    }
    info!("Found {} invalid initiator reshares", report.found);

    if mode != RunMode::Fix {
        return Ok(());
    }

    for fix in &fixes {
        let share_id = fix.share.id;
        repo.update_share_initiator(share_id, fix.new_initiator())
            .map_err(|e| Error::mutation(share_id, "update initiator of", e))?;
        report.repaired += 1;
        progress.on_record(PassKind::InvalidInitiator, report.found, report.repaired);
    }

    info!("Repaired {} invalid initiator reshares", report.repaired);
    Ok(())
}

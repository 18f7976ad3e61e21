use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::classify::{classify, OwnerRepair};
use super::storage_id::StorageIdentifier;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::report::{PassKind, PassReport};
use crate::runner::RunMode;
use crate::storage::models::OwnerScanRow;
use crate::storage::ShareRepository;

/// A share selected by the owner scan together with the decided repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerFix {
    pub row: OwnerScanRow,
    pub true_owner: String,
    pub repair: OwnerRepair,
}

impl OwnerFix {
    pub fn describe(&self) -> String {
        let share = &self.row.share;
        match &self.repair {
            OwnerRepair::ReassignOwner { new_owner } => format!(
                "share {}: uid_owner {} -> {} (storage {})",
                share.id, share.uid_owner, new_owner, self.row.storage
            ),
            OwnerRepair::DeleteCorrupted => format!(
                "share {}: shared with storage owner {}, delete (storage {})",
                share.id, self.true_owner, self.row.storage
            ),
        }
    }
}

/// Scan every storage prefix and classify each mismatching share.
/// Read-only. Rows with an unparseable storage identifier are skipped.
pub fn plan_owner_fixes<R: ShareRepository + ?Sized>(
    repo: &R,
    storage_prefixes: &[String],
    progress: &dyn ProgressReporter,
) -> Result<Vec<OwnerFix>, Error> {
    let mut fixes = Vec::new();
    let mut seen = HashSet::new();

    for prefix in storage_prefixes {
        progress.on_scan_source(PassKind::InvalidOwner, prefix);
        let rows = repo.find_invalid_owner_shares(prefix)?;
        debug!("{} candidate shares on '{}' storages", rows.len(), prefix);

        for row in rows {
            let storage = match StorageIdentifier::resolve(&row.storage, storage_prefixes) {
                Ok(storage) => storage,
                Err(e) => {
                    warn!("Skipping share {}: {}", row.share.id, e);
                    continue;
                }
            };
            if storage.owner == row.share.uid_owner {
                continue;
            }
            // overlapping prefixes can select the same row twice
            if !seen.insert(row.share.id) {
                continue;
            }
            let repair = classify(&row.share, &storage.owner);
            fixes.push(OwnerFix {
                row,
                true_owner: storage.owner,
                repair,
            });
        }
    }

    Ok(fixes)
}

/// Find shares whose `uid_owner` disagrees with their storage and, in fix
/// mode, repair or delete them. Any failed mutation aborts the pass; the
/// report then holds the full found count and only the successful repairs.
pub fn reconcile_owners<R: ShareRepository + ?Sized>(
    repo: &R,
    storage_prefixes: &[String],
    mode: RunMode,
    report: &mut PassReport,
    progress: &dyn ProgressReporter,
) -> Result<(), Error> {
    let fixes = plan_owner_fixes(repo, storage_prefixes, progress)?;
    report.found = fixes.len();
    for fix in &fixes {
        report.note(fix.describe());
    }
    info!("Found {} invalid share owners", report.found);

    if mode != RunMode::Fix {
        return Ok(());
    }

    for fix in &fixes {
        let share_id = fix.row.share.id;
        match &fix.repair {
            OwnerRepair::DeleteCorrupted => repo
                .delete_share(share_id)
                .map_err(|e| Error::mutation(share_id, "delete", e))?,
            OwnerRepair::ReassignOwner { new_owner } => repo
                .update_share_owner(share_id, new_owner)
                .map_err(|e| Error::mutation(share_id, "update owner of", e))?,
        }
        report.repaired += 1;
        progress.on_record(PassKind::InvalidOwner, report.found, report.repaired);
    }

    info!("Repaired {} invalid share owners", report.repaired);
    Ok(())
}

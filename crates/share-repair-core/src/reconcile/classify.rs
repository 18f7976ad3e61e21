use crate::storage::models::ShareRecord;

/// What to do with a share whose recorded owner disagrees with its storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerRepair {
    /// Point `uid_owner` at the storage owner, keep the grant.
    ReassignOwner { new_owner: String },
    /// The share grants the file to its own owner. Remove the row.
    DeleteCorrupted,
}

/// A share left pointing at the user who now owns the file. Ownership
/// transfers can produce these; they cannot be repaired, only removed.
pub fn is_self_share(share: &ShareRecord, true_owner: &str) -> bool {
    share.share_with.as_deref() == Some(true_owner)
}

pub fn classify(share: &ShareRecord, true_owner: &str) -> OwnerRepair {
    if is_self_share(share, true_owner) {
        OwnerRepair::DeleteCorrupted
    } else {
        OwnerRepair::ReassignOwner {
            new_owner: true_owner.to_string(),
        }
    }
}

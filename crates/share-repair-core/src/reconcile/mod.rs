pub mod classify;
pub mod initiator;
pub mod owner;
pub mod storage_id;

pub use classify::{classify, is_self_share, OwnerRepair};
pub use initiator::{plan_initiator_fixes, reconcile_initiators, InitiatorFix};
pub use owner::{plan_owner_fixes, reconcile_owners, OwnerFix};
pub use storage_id::StorageIdentifier;

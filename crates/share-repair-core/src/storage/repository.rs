use super::models::{OwnerScanRow, ShareRecord};
use super::sqlite::Database;
use crate::error::Error;

/// Store capabilities the reconciliation passes need: predicate queries,
/// update by id and delete by id.
///
/// Mutations must either change exactly the addressed row or fail. A share
/// id that matches no row is an error, never a silent success.
pub trait ShareRepository {
    fn find_invalid_owner_shares(&self, storage_prefix: &str) -> Result<Vec<OwnerScanRow>, Error>;
    fn find_resharers(&self) -> Result<Vec<String>, Error>;
    fn find_reshares_for_user(&self, uid_initiator: &str) -> Result<Vec<ShareRecord>, Error>;
    fn update_share_owner(&self, share_id: i64, uid_owner: &str) -> Result<(), Error>;
    fn update_share_initiator(&self, share_id: i64, uid_initiator: &str) -> Result<(), Error>;
    fn delete_share(&self, share_id: i64) -> Result<(), Error>;
}

fn expect_row(share_id: i64, changed: usize) -> Result<(), Error> {
    if changed == 0 {
        Err(Error::ShareNotFound(share_id))
    } else {
        Ok(())
    }
}

impl ShareRepository for Database {
    fn find_invalid_owner_shares(&self, storage_prefix: &str) -> Result<Vec<OwnerScanRow>, Error> {
        Ok(self.get_invalid_owner_shares(storage_prefix)?)
    }

    fn find_resharers(&self) -> Result<Vec<String>, Error> {
        Ok(self.get_all_resharers()?)
    }

    fn find_reshares_for_user(&self, uid_initiator: &str) -> Result<Vec<ShareRecord>, Error> {
        Ok(self.get_reshares_for_user(uid_initiator)?)
    }

    fn update_share_owner(&self, share_id: i64, uid_owner: &str) -> Result<(), Error> {
        let changed = self.set_share_owner(share_id, uid_owner)?;
        expect_row(share_id, changed)
    }

    fn update_share_initiator(&self, share_id: i64, uid_initiator: &str) -> Result<(), Error> {
        let changed = self.set_share_initiator(share_id, uid_initiator)?;
        expect_row(share_id, changed)
    }

    fn delete_share(&self, share_id: i64) -> Result<(), Error> {
        let deleted = self.remove_share(share_id)?;
        expect_row(share_id, deleted)
    }
}

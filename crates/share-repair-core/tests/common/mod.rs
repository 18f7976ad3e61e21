#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use share_repair_core::storage::models::{OwnerScanRow, ShareRecord, ShareType};
use share_repair_core::{Error, FileSpace, Node, ShareRepository, UserFolder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindInvalidOwnerShares(String),
    FindResharers,
    FindResharesForUser(String),
    UpdateShareOwner(i64, String),
    UpdateShareInitiator(i64, String),
    DeleteShare(i64),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::UpdateShareOwner(..) | Call::UpdateShareInitiator(..) | Call::DeleteShare(_)
        )
    }
}

/// Share store fake that returns canned rows and records every call.
#[derive(Default)]
pub struct FakeRepo {
    pub invalid_by_prefix: HashMap<String, Vec<OwnerScanRow>>,
    pub resharers: Vec<String>,
    pub reshares: HashMap<String, Vec<ShareRecord>>,
    /// Mutations on this share id fail as if the store went away.
    pub fail_on: Option<i64>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeRepo {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    fn mutate(&self, call: Call, share_id: i64) -> Result<(), Error> {
        self.calls.borrow_mut().push(call);
        if self.fail_on == Some(share_id) {
            return Err(Error::Database(rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }
}

impl ShareRepository for FakeRepo {
    fn find_invalid_owner_shares(&self, storage_prefix: &str) -> Result<Vec<OwnerScanRow>, Error> {
        self.calls
            .borrow_mut()
            .push(Call::FindInvalidOwnerShares(storage_prefix.to_string()));
        Ok(self
            .invalid_by_prefix
            .get(storage_prefix)
            .cloned()
            .unwrap_or_default())
    }

    fn find_resharers(&self) -> Result<Vec<String>, Error> {
        self.calls.borrow_mut().push(Call::FindResharers);
        Ok(self.resharers.clone())
    }

    fn find_reshares_for_user(&self, uid_initiator: &str) -> Result<Vec<ShareRecord>, Error> {
        self.calls
            .borrow_mut()
            .push(Call::FindResharesForUser(uid_initiator.to_string()));
        Ok(self.reshares.get(uid_initiator).cloned().unwrap_or_default())
    }

    fn update_share_owner(&self, share_id: i64, uid_owner: &str) -> Result<(), Error> {
        self.mutate(Call::UpdateShareOwner(share_id, uid_owner.to_string()), share_id)
    }

    fn update_share_initiator(&self, share_id: i64, uid_initiator: &str) -> Result<(), Error> {
        self.mutate(
            Call::UpdateShareInitiator(share_id, uid_initiator.to_string()),
            share_id,
        )
    }

    fn delete_share(&self, share_id: i64) -> Result<(), Error> {
        self.mutate(Call::DeleteShare(share_id), share_id)
    }
}

/// File space fake: each known user sees exactly the listed file ids.
#[derive(Default)]
pub struct FakeFiles {
    pub folders: HashMap<String, HashSet<i64>>,
    /// File ids whose parent chain loops, for every user.
    pub looping_files: HashSet<i64>,
    pub folder_requests: RefCell<Vec<String>>,
    pub lookups: Rc<RefCell<Vec<(String, i64, bool)>>>,
}

impl FakeFiles {
    pub fn with_user(mut self, uid: &str, file_ids: &[i64]) -> Self {
        self.folders
            .insert(uid.to_string(), file_ids.iter().copied().collect());
        self
    }

    pub fn with_looping_file(mut self, file_id: i64) -> Self {
        self.looping_files.insert(file_id);
        self
    }
}

pub struct FakeFolder {
    uid: String,
    file_ids: HashSet<i64>,
    looping_files: HashSet<i64>,
    lookups: Rc<RefCell<Vec<(String, i64, bool)>>>,
}

impl FileSpace for FakeFiles {
    type Folder = FakeFolder;

    fn user_folder(&self, uid: &str) -> Result<FakeFolder, Error> {
        self.folder_requests.borrow_mut().push(uid.to_string());
        let file_ids = self
            .folders
            .get(uid)
            .cloned()
            .ok_or_else(|| Error::UnresolvableUser(uid.to_string()))?;
        Ok(FakeFolder {
            uid: uid.to_string(),
            file_ids,
            looping_files: self.looping_files.clone(),
            lookups: Rc::clone(&self.lookups),
        })
    }
}

impl UserFolder for FakeFolder {
    fn get_by_id(&self, file_id: i64, include_trashed: bool) -> Result<Vec<Node>, Error> {
        self.lookups
            .borrow_mut()
            .push((self.uid.clone(), file_id, include_trashed));
        if self.looping_files.contains(&file_id) {
            return Err(Error::FileCacheCycle(file_id));
        }
        if self.file_ids.contains(&file_id) {
            Ok(vec![Node {
                file_id,
                path: format!("files/{}", file_id),
                trashed: false,
            }])
        } else {
            Ok(Vec::new())
        }
    }
}

pub fn share(
    id: i64,
    parent: Option<i64>,
    file_source: i64,
    uid_owner: &str,
    uid_initiator: &str,
    share_with: &str,
) -> ShareRecord {
    ShareRecord {
        id,
        share_type: ShareType::User,
        parent,
        file_source,
        uid_owner: uid_owner.to_string(),
        uid_initiator: uid_initiator.to_string(),
        share_with: Some(share_with.to_string()),
    }
}

pub fn scan_row(share: ShareRecord, storage: &str) -> OwnerScanRow {
    OwnerScanRow {
        share,
        storage: storage.to_string(),
    }
}

pub fn default_prefixes() -> Vec<String> {
    vec!["home::".to_string(), "object::user:".to_string()]
}

/// One correctable share (id 1) and one share pointing back at the storage
/// owner (id 2), both on `home::user1` but recorded as owned by user2.
pub fn owner_mismatch_repo() -> FakeRepo {
    let mut repo = FakeRepo::default();
    repo.invalid_by_prefix.insert(
        "home::".to_string(),
        vec![
            scan_row(share(1, None, 1, "user2", "user2", "user3"), "home::user1"),
            scan_row(share(2, None, 1, "user2", "user2", "user1"), "home::user1"),
        ],
    );
    repo
}

/// user2 reshared file 1 (owned by user1) to user3 but no longer sees it.
pub fn lost_reshare_repo() -> FakeRepo {
    let mut repo = FakeRepo::default();
    repo.resharers = vec!["user2".to_string()];
    repo.reshares.insert(
        "user2".to_string(),
        vec![share(1, Some(7), 1, "user1", "user2", "user3")],
    );
    repo
}

//! Per-user file space lookups.
//!
//! A user's folder can see a file when the file lives on one of the user's
//! own storages, or when the file (or one of its ancestors) is shared with
//! the user directly or through a group. Items under `files_trashbin/` are
//! only returned when trashed items are asked for; a trashed item is
//! reachable through the shares of the folder it was deleted from.

use std::collections::HashSet;

use crate::error::Error;
use crate::reconcile::storage_id::StorageIdentifier;
use crate::storage::models::FileEntry;
use crate::storage::Database;
use serde::Serialize;
use tracing::debug;

pub const TRASHBIN_PREFIX: &str = "files_trashbin/";

const TRASHBIN_FILES: &str = "files_trashbin/files/";

/// A file or folder resolved inside a user's folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub file_id: i64,
    pub path: String,
    pub trashed: bool,
}

/// Resolves users to the root of their personal file space.
pub trait FileSpace {
    type Folder: UserFolder;

    /// Fails with [`Error::UnresolvableUser`] when the user or their home
    /// storage no longer exists.
    fn user_folder(&self, uid: &str) -> Result<Self::Folder, Error>;
}

pub trait UserFolder {
    /// All nodes in this folder with the given file id. An empty vector
    /// means the id cannot be resolved for this user.
    fn get_by_id(&self, file_id: i64, include_trashed: bool) -> Result<Vec<Node>, Error>;
}

/// File space backed by the `users`, `storages`, `filecache`, `files_trash`,
/// `share` and `group_user` tables.
pub struct DbFileSpace<'a> {
    db: &'a Database,
    storage_prefixes: Vec<String>,
}

impl<'a> DbFileSpace<'a> {
    pub fn new(db: &'a Database, storage_prefixes: &[String]) -> Self {
        Self {
            db,
            storage_prefixes: storage_prefixes.to_vec(),
        }
    }
}

impl<'a> FileSpace for DbFileSpace<'a> {
    type Folder = DbUserFolder<'a>;

    fn user_folder(&self, uid: &str) -> Result<DbUserFolder<'a>, Error> {
        if !self.db.user_exists(uid)? {
            return Err(Error::UnresolvableUser(uid.to_string()));
        }

        let mut home_storages = Vec::new();
        for prefix in &self.storage_prefixes {
            if let Some(storage) = self.db.get_storage_by_id(&format!("{}{}", prefix, uid))? {
                home_storages.push(storage.numeric_id);
            }
        }
        if home_storages.is_empty() {
            return Err(Error::UnresolvableUser(uid.to_string()));
        }

        Ok(DbUserFolder {
            db: self.db,
            uid: uid.to_string(),
            home_storages,
            storage_prefixes: self.storage_prefixes.clone(),
        })
    }
}

pub struct DbUserFolder<'a> {
    db: &'a Database,
    uid: String,
    home_storages: Vec<i64>,
    storage_prefixes: Vec<String>,
}

/// Split a trashbin entry name `<name>.d<timestamp>` into its parts.
fn split_trashed_name(entry: &str) -> Option<(&str, i64)> {
    let (name, timestamp) = entry.rsplit_once(".d")?;
    let timestamp = timestamp.parse().ok()?;
    if name.is_empty() {
        return None;
    }
    Some((name, timestamp))
}

impl<'a> DbUserFolder<'a> {
    /// Walk from the file up to its storage root looking for a share that
    /// mounts it into this user's folder. A chain that revisits a file is
    /// [`Error::FileCacheCycle`].
    fn reachable_through_share(&self, file: &FileEntry) -> Result<bool, Error> {
        let mut visited = HashSet::new();
        let mut current = Some(file.clone());
        while let Some(entry) = current {
            if !visited.insert(entry.fileid) {
                return Err(Error::FileCacheCycle(file.fileid));
            }
            if self.db.has_incoming_share(&self.uid, entry.fileid)? {
                return Ok(true);
            }
            current = self.parent_of(&entry)?;
        }
        Ok(false)
    }

    /// The cache parent, except for a top-level trashbin entry, whose parent
    /// is the folder it was deleted from.
    fn parent_of(&self, entry: &FileEntry) -> Result<Option<FileEntry>, Error> {
        if let Some(trashed) = entry.path.strip_prefix(TRASHBIN_FILES) {
            if !trashed.contains('/') {
                return self.original_parent(entry.storage, trashed);
            }
        }
        match entry.parent {
            Some(parent) => Ok(self.db.get_file(parent)?),
            None => Ok(None),
        }
    }

    fn original_parent(&self, storage: i64, trashed: &str) -> Result<Option<FileEntry>, Error> {
        let location = match split_trashed_name(trashed) {
            Some((name, timestamp)) => self.trash_location(storage, name, timestamp)?,
            None => None,
        };
        // no trash record: restore falls back to the root
        let path = match location.as_deref() {
            None | Some(".") | Some("") => "files".to_string(),
            Some(dir) => format!("files/{}", dir.trim_matches('/')),
        };
        Ok(self.db.get_file_by_path(storage, &path)?)
    }

    fn trash_location(
        &self,
        storage: i64,
        name: &str,
        timestamp: i64,
    ) -> Result<Option<String>, Error> {
        let entry = match self.db.get_storage(storage)? {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let owner = match StorageIdentifier::resolve(&entry.id, &self.storage_prefixes) {
            Ok(id) => id.owner,
            Err(_) => return Ok(None),
        };
        Ok(self.db.get_trash_location(&owner, name, timestamp)?)
    }
}

impl<'a> UserFolder for DbUserFolder<'a> {
    fn get_by_id(&self, file_id: i64, include_trashed: bool) -> Result<Vec<Node>, Error> {
        let file = match self.db.get_file(file_id)? {
            Some(file) => file,
            None => return Ok(Vec::new()),
        };
        let trashed = file.path.starts_with(TRASHBIN_PREFIX);

        let visible = if trashed && !include_trashed {
            false
        } else if self.home_storages.contains(&file.storage) {
            true
        } else {
            self.reachable_through_share(&file)?
        };

        debug!(
            "File {} in folder of {}: {}",
            file_id,
            self.uid,
            if visible { "resolved" } else { "not found" }
        );

        if !visible {
            return Ok(Vec::new());
        }
        Ok(vec![Node {
            file_id: file.fileid,
            path: file.path,
            trashed,
        }])
    }
}

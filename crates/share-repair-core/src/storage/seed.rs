//! Seeding helpers for fixtures, demos and tests.
//!
//! These write users, storages, file cache rows, trashbin entries and shares
//! the way the file server would. The repair passes never call them; they
//! only go through the queries in `queries.rs`.

use super::models::*;
use super::sqlite::Database;
use rusqlite::{params, Result};
use tracing::debug;

impl Database {
    /// Seeding helper: insert a share row and return its id.
    pub fn insert_share(&self, share: &NewShare<'_>) -> Result<i64> {
        self.connection().execute(
            "INSERT INTO share (share_type, parent, file_source, uid_owner, uid_initiator, share_with) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                share.share_type.code(),
                share.parent,
                share.file_source,
                share.uid_owner,
                share.uid_initiator,
                share.share_with,
            ],
        )?;
        Ok(self.connection().last_insert_rowid())
    }

    /// Seeding helper: register a user account.
    pub fn insert_user(&self, uid: &str) -> Result<()> {
        self.connection()
            .execute("INSERT OR IGNORE INTO users (uid) VALUES (?1)", params![uid])?;
        Ok(())
    }

    /// Seeding helper.
    pub fn add_user_to_group(&self, gid: &str, uid: &str) -> Result<()> {
        self.connection().execute(
            "INSERT OR IGNORE INTO group_user (gid, uid) VALUES (?1, ?2)",
            params![gid, uid],
        )?;
        Ok(())
    }

    /// Seeding helper: register a storage, returning its numeric id.
    /// Registering the same identifier twice returns the existing id.
    pub fn insert_storage(&self, storage_id: &str) -> Result<i64> {
        self.connection().execute(
            "INSERT OR IGNORE INTO storages (id) VALUES (?1)",
            params![storage_id],
        )?;
        self.connection().query_row(
            "SELECT numeric_id FROM storages WHERE id = ?1",
            params![storage_id],
            |row| row.get(0),
        )
    }

    /// Seeding helper: add a file cache row and return its file id.
    pub fn insert_file(&self, storage: i64, path: &str, parent: Option<i64>) -> Result<i64> {
        self.connection().execute(
            "INSERT INTO filecache (storage, path, parent) VALUES (?1, ?2, ?3)",
            params![storage, path, parent],
        )?;
        Ok(self.connection().last_insert_rowid())
    }

    /// Seeding helper: rewrite a single row's path, leaving its parent and
    /// any children alone.
    pub fn move_file(&self, fileid: i64, new_path: &str) -> Result<()> {
        self.connection().execute(
            "UPDATE filecache SET path = ?1 WHERE fileid = ?2",
            params![new_path, fileid],
        )?;
        Ok(())
    }

    /// Seeding helper: drop a file cache row, as a trashbin purge does.
    pub fn delete_file(&self, fileid: i64) -> Result<()> {
        self.connection()
            .execute("DELETE FROM filecache WHERE fileid = ?1", params![fileid])?;
        Ok(())
    }

    /// Seeding helper: move a file or folder under `files/` into `owner`'s
    /// trashbin as `files_trashbin/files/<name>.d<timestamp>`, together with
    /// everything below it, and record where it came from in `files_trash`.
    /// Returns the new path.
    pub fn trash_file(&self, fileid: i64, owner: &str, timestamp: i64) -> Result<String> {
        let (storage, old_path): (i64, String) = self.connection().query_row(
            "SELECT storage, path FROM filecache WHERE fileid = ?1",
            params![fileid],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let relative = old_path.strip_prefix("files/").unwrap_or(&old_path);
        let (location, name) = match relative.rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => (".", relative),
        };
        let new_path = format!("files_trashbin/files/{}.d{}", name, timestamp);

        let trash_root = self.ensure_folder(storage, "files_trashbin", None)?;
        let trash_files = self.ensure_folder(storage, "files_trashbin/files", Some(trash_root))?;

        let conn = self.connection();
        conn.execute(
            "UPDATE filecache SET path = ?1 || substr(path, length(?2) + 1) \
             WHERE storage = ?3 AND (path = ?2 OR substr(path, 1, length(?2) + 1) = ?2 || '/')",
            params![new_path, old_path, storage],
        )?;
        conn.execute(
            "UPDATE filecache SET parent = ?1 WHERE fileid = ?2",
            params![trash_files, fileid],
        )?;
        conn.execute(
            "INSERT OR REPLACE INTO files_trash (id, user, timestamp, location) \
             VALUES (?1, ?2, ?3, ?4)",
            params![name, owner, timestamp, location],
        )?;
        debug!("Trashed {} as {} (from '{}')", old_path, new_path, location);
        Ok(new_path)
    }

    fn ensure_folder(&self, storage: i64, path: &str, parent: Option<i64>) -> Result<i64> {
        self.connection().execute(
            "INSERT OR IGNORE INTO filecache (storage, path, parent) VALUES (?1, ?2, ?3)",
            params![storage, path, parent],
        )?;
        self.connection().query_row(
            "SELECT fileid FROM filecache WHERE storage = ?1 AND path = ?2",
            params![storage, path],
            |row| row.get(0),
        )
    }
}

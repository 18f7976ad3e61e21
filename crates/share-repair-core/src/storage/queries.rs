use super::models::*;
use super::sqlite::Database;
use rusqlite::{params, OptionalExtension, Result, Row};
use tracing::debug;

const SHARE_COLUMNS: &str =
    "s.id, s.share_type, s.parent, s.file_source, s.uid_owner, s.uid_initiator, s.share_with";

fn file_from_row(row: &Row<'_>) -> Result<FileEntry> {
    Ok(FileEntry {
        fileid: row.get(0)?,
        storage: row.get(1)?,
        path: row.get(2)?,
        parent: row.get(3)?,
    })
}

fn share_from_row(row: &Row<'_>) -> Result<ShareRecord> {
    Ok(ShareRecord {
        id: row.get(0)?,
        share_type: ShareType::from_code(row.get(1)?),
        parent: row.get(2)?,
        file_source: row.get(3)?,
        uid_owner: row.get(4)?,
        uid_initiator: row.get(5)?,
        share_with: row.get(6)?,
    })
}

impl Database {
    // ── Owner Scan ───────────────────────────────────────────────

    /// Shares whose file lives on a storage with the given identifier prefix
    /// and whose `uid_owner` differs from the user encoded after that prefix.
    pub fn get_invalid_owner_shares(&self, storage_prefix: &str) -> Result<Vec<OwnerScanRow>> {
        let sql = format!(
            "SELECT {}, st.id \
             FROM share s \
             JOIN filecache f ON s.file_source = f.fileid \
             JOIN storages st ON f.storage = st.numeric_id \
             WHERE substr(st.id, 1, length(?1)) = ?1 \
               AND s.uid_owner <> substr(st.id, length(?1) + 1) \
             ORDER BY s.id",
            SHARE_COLUMNS
        );
        let mut stmt = self.connection().prepare(&sql)?;
        let rows = stmt
            .query_map(params![storage_prefix], |row| {
                Ok(OwnerScanRow {
                    share: share_from_row(row)?,
                    storage: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "{} shares with mismatching owner on '{}' storages",
            rows.len(),
            storage_prefix
        );
        Ok(rows)
    }

    // ── Reshares ─────────────────────────────────────────────────

    /// Distinct initiators of re-shares, sorted.
    pub fn get_all_resharers(&self) -> Result<Vec<String>> {
        let mut stmt = self.connection().prepare(
            "SELECT DISTINCT uid_initiator FROM share \
             WHERE parent IS NOT NULL \
             ORDER BY uid_initiator",
        )?;
        let users = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>>>()?;
        Ok(users)
    }

    pub fn get_reshares_for_user(&self, uid_initiator: &str) -> Result<Vec<ShareRecord>> {
        let sql = format!(
            "SELECT {} FROM share s \
             WHERE s.parent IS NOT NULL AND s.uid_initiator = ?1 \
             ORDER BY s.id",
            SHARE_COLUMNS
        );
        let mut stmt = self.connection().prepare(&sql)?;
        let shares = stmt
            .query_map(params![uid_initiator], share_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(shares)
    }

    pub fn get_share(&self, share_id: i64) -> Result<Option<ShareRecord>> {
        let sql = format!("SELECT {} FROM share s WHERE s.id = ?1", SHARE_COLUMNS);
        self.connection()
            .query_row(&sql, params![share_id], share_from_row)
            .optional()
    }

    /// Whether `uid` receives a user share, or a group share through one of
    /// their groups, on `file_source`.
    pub fn has_incoming_share(&self, uid: &str, file_source: i64) -> Result<bool> {
        let count: i64 = self.connection().query_row(
            "SELECT COUNT(*) FROM share \
             WHERE file_source = ?1 \
               AND ((share_type = 0 AND share_with = ?2) \
                 OR (share_type = 1 AND share_with IN \
                     (SELECT gid FROM group_user WHERE uid = ?2)))",
            params![file_source, uid],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ── Share Mutations ──────────────────────────────────────────

    /// Returns the number of rows matched (0 or 1).
    pub fn set_share_owner(&self, share_id: i64, uid_owner: &str) -> Result<usize> {
        let changed = self.connection().execute(
            "UPDATE share SET uid_owner = ?1 WHERE id = ?2",
            params![uid_owner, share_id],
        )?;
        debug!("Set uid_owner of share {} to {} ({} row)", share_id, uid_owner, changed);
        Ok(changed)
    }

    /// Returns the number of rows matched (0 or 1).
    pub fn set_share_initiator(&self, share_id: i64, uid_initiator: &str) -> Result<usize> {
        let changed = self.connection().execute(
            "UPDATE share SET uid_initiator = ?1 WHERE id = ?2",
            params![uid_initiator, share_id],
        )?;
        debug!(
            "Set uid_initiator of share {} to {} ({} row)",
            share_id, uid_initiator, changed
        );
        Ok(changed)
    }

    pub fn remove_share(&self, share_id: i64) -> Result<usize> {
        let deleted = self
            .connection()
            .execute("DELETE FROM share WHERE id = ?1", params![share_id])?;
        debug!("Deleted share {} ({} row)", share_id, deleted);
        Ok(deleted)
    }

    // ── Users & Groups ───────────────────────────────────────────

    pub fn user_exists(&self, uid: &str) -> Result<bool> {
        let count: i64 = self.connection().query_row(
            "SELECT COUNT(*) FROM users WHERE uid = ?1",
            params![uid],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ── Storages & File Cache ────────────────────────────────────

    pub fn get_storage_by_id(&self, storage_id: &str) -> Result<Option<StorageEntry>> {
        self.connection()
            .query_row(
                "SELECT numeric_id, id FROM storages WHERE id = ?1",
                params![storage_id],
                |row| {
                    Ok(StorageEntry {
                        numeric_id: row.get(0)?,
                        id: row.get(1)?,
                    })
                },
            )
            .optional()
    }

    pub fn get_storage(&self, numeric_id: i64) -> Result<Option<StorageEntry>> {
        self.connection()
            .query_row(
                "SELECT numeric_id, id FROM storages WHERE numeric_id = ?1",
                params![numeric_id],
                |row| {
                    Ok(StorageEntry {
                        numeric_id: row.get(0)?,
                        id: row.get(1)?,
                    })
                },
            )
            .optional()
    }

    pub fn get_file(&self, fileid: i64) -> Result<Option<FileEntry>> {
        self.connection()
            .query_row(
                "SELECT fileid, storage, path, parent FROM filecache WHERE fileid = ?1",
                params![fileid],
                file_from_row,
            )
            .optional()
    }

    pub fn get_file_by_path(&self, storage: i64, path: &str) -> Result<Option<FileEntry>> {
        self.connection()
            .query_row(
                "SELECT fileid, storage, path, parent FROM filecache \
                 WHERE storage = ?1 AND path = ?2",
                params![storage, path],
                file_from_row,
            )
            .optional()
    }

    // ── Trashbin ─────────────────────────────────────────────────

    /// Folder a trashed item was deleted from, relative to the owner's
    /// `files/` root (`.` for the root itself).
    pub fn get_trash_location(
        &self,
        uid: &str,
        name: &str,
        timestamp: i64,
    ) -> Result<Option<String>> {
        self.connection()
            .query_row(
                "SELECT location FROM files_trash \
                 WHERE user = ?1 AND id = ?2 AND timestamp = ?3",
                params![uid, name, timestamp],
                |row| row.get(0),
            )
            .optional()
    }
}

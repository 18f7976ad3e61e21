use serde::Serialize;

/// Kind of grant a share row represents, as stored in `share.share_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    User,
    Group,
    Link,
    Remote,
    Other(i64),
}

impl ShareType {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ShareType::User,
            1 => ShareType::Group,
            3 => ShareType::Link,
            6 => ShareType::Remote,
            other => ShareType::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            ShareType::User => 0,
            ShareType::Group => 1,
            ShareType::Link => 3,
            ShareType::Remote => 6,
            ShareType::Other(code) => code,
        }
    }
}

/// A persisted grant of access to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareRecord {
    pub id: i64,
    pub share_type: ShareType,
    /// Set iff this row is a re-share of another share.
    pub parent: Option<i64>,
    pub file_source: i64,
    pub uid_owner: String,
    pub uid_initiator: String,
    pub share_with: Option<String>,
}

impl ShareRecord {
    pub fn is_reshare(&self) -> bool {
        self.parent.is_some()
    }
}

/// A share joined with the identifier of the storage holding its file.
/// Only produced by the invalid owner scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerScanRow {
    pub share: ShareRecord,
    pub storage: String,
}

/// A storage backend registered in `storages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub numeric_id: i64,
    pub id: String,
}

/// A file or folder known to the file cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub fileid: i64,
    pub storage: i64,
    pub path: String,
    pub parent: Option<i64>,
}

/// New share row for seeding a database. `id` is assigned by SQLite.
#[derive(Debug, Clone)]
pub struct NewShare<'a> {
    pub share_type: ShareType,
    pub parent: Option<i64>,
    pub file_source: i64,
    pub uid_owner: &'a str,
    pub uid_initiator: &'a str,
    pub share_with: Option<&'a str>,
}

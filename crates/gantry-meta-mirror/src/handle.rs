//! Snapshot store handle
//!
//! One open redb database rooted in a snapshot directory. Handles are
//! built, swapped in as current by the manager, and dropped; dropping
//! closes the database, so a superseded store is released exactly when
//! the last reader holding an `Arc` to it finishes.

use crate::schema::{self, MirrorTable};
use redb::{Database, ReadableTable};
use std::path::{Path, PathBuf};

/// Error type for mirror store operations
#[derive(Debug, thiserror::Error)]
pub enum MirrorStoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::DatabaseError),
    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("redb transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<redb::TransactionError> for MirrorStoreError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(e))
    }
}

impl From<MirrorStoreError> for gantry_common::Error {
    fn from(e: MirrorStoreError) -> Self {
        Self::Store(e.to_string())
    }
}

pub type MirrorStoreResult<T> = Result<T, MirrorStoreError>;

/// An open handle to one ingested metadata snapshot
pub struct MirrorStoreHandle {
    db: Database,
    dir: PathBuf,
    sequence_number: u64,
}

impl MirrorStoreHandle {
    /// Open the store inside a snapshot directory with the given table
    /// registrations.
    ///
    /// Every table is opened eagerly so later read transactions cannot
    /// fail on a table the snapshot producer never touched. The durable
    /// sequence number is read once at open; the snapshot is immutable
    /// afterwards.
    pub fn open(dir: &Path, store_name: &str, tables: &[MirrorTable]) -> MirrorStoreResult<Self> {
        std::fs::create_dir_all(dir)?;
        let db = Database::create(dir.join(format!("{store_name}.redb")))?;

        let write_txn = db.begin_write()?;
        for table in tables {
            let _ = write_txn.open_table(*table)?;
        }
        write_txn.commit()?;

        let sequence_number = read_sequence_number(&db)?;
        Ok(Self {
            db,
            dir: dir.to_path_buf(),
            sequence_number,
        })
    }

    /// The latest durable log sequence number the snapshot carries
    #[must_use]
    pub const fn latest_sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// The snapshot directory backing this store
    #[must_use]
    pub fn backing_dir(&self) -> &Path {
        &self.dir
    }

    /// Read a raw value from a mirrored table
    pub fn get(&self, table: MirrorTable, key: &str) -> MirrorStoreResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        Ok(table.get(key)?.map(|v| v.value().to_vec()))
    }

    /// Read and decode a bincode-encoded value from a mirrored table
    pub fn get_decoded<T: serde::de::DeserializeOwned>(
        &self,
        table: MirrorTable,
        key: &str,
    ) -> MirrorStoreResult<Option<T>> {
        match self.get(table, key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }
}

fn read_sequence_number(db: &Database) -> MirrorStoreResult<u64> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(schema::META)?;
    match table.get(schema::SEQUENCE_NUMBER_KEY)? {
        Some(value) => Ok(bincode::deserialize(value.value())?),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::write_snapshot;
    use tempfile::TempDir;

    #[test]
    fn test_open_reads_sequence_number() {
        let root = TempDir::new().unwrap();
        let dir = write_snapshot(root.path(), "meta_snapshot", 1, 1234);
        let handle =
            MirrorStoreHandle::open(&dir, "meta_snapshot", schema::upstream_tables()).unwrap();
        assert_eq!(handle.latest_sequence_number(), 1234);
        assert_eq!(handle.backing_dir(), dir.as_path());
    }

    #[test]
    fn test_fresh_store_has_sequence_zero() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("empty");
        let handle =
            MirrorStoreHandle::open(&dir, "meta_snapshot", schema::upstream_tables()).unwrap();
        assert_eq!(handle.latest_sequence_number(), 0);
    }

    #[test]
    fn test_get_missing_key() {
        let root = TempDir::new().unwrap();
        let dir = write_snapshot(root.path(), "meta_snapshot", 1, 1);
        let handle =
            MirrorStoreHandle::open(&dir, "meta_snapshot", schema::upstream_tables()).unwrap();
        assert_eq!(handle.get(schema::CONTAINERS, "42").unwrap(), None);
    }

    #[test]
    fn test_get_decoded_meta() {
        let root = TempDir::new().unwrap();
        let dir = write_snapshot(root.path(), "meta_snapshot", 2, 77);
        let handle =
            MirrorStoreHandle::open(&dir, "meta_snapshot", schema::upstream_tables()).unwrap();
        let seq: Option<u64> = handle
            .get_decoded(schema::META, schema::SEQUENCE_NUMBER_KEY)
            .unwrap();
        assert_eq!(seq, Some(77));
    }

    #[test]
    fn test_open_fails_on_unusable_directory() {
        let root = TempDir::new().unwrap();
        // a plain file where the snapshot directory should be
        let blocker = root.path().join("snap");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let result = MirrorStoreHandle::open(&blocker, "meta_snapshot", schema::upstream_tables());
        assert!(result.is_err());
    }
}

//! Mirrored metadata store
//!
//! Tracks the upstream metadata authority by ingesting fully materialized
//! snapshots of its store. The current snapshot is exposed through a
//! hot-swappable, reference-counted handle: readers keep querying the
//! handle they acquired even while a newer snapshot is being installed,
//! and a superseded store is only released once the last such reader is
//! done with it.

pub mod handle;
pub mod manager;
pub mod schema;
pub mod snapshot;

pub use handle::{MirrorStoreError, MirrorStoreHandle};
pub use manager::MetaMirrorManager;
pub use snapshot::{find_most_recent_snapshot_dir, snapshot_dir_name};

#[cfg(test)]
pub(crate) mod testutil {
    use crate::schema;
    use crate::snapshot::snapshot_dir_name;
    use std::path::{Path, PathBuf};

    /// Create a snapshot directory under `root` the way the upstream sync
    /// loop would: a store file with all tables present and the durable
    /// sequence number recorded in the meta table.
    pub fn write_snapshot(root: &Path, store_name: &str, ordinal: u64, sequence: u64) -> PathBuf {
        let dir = root.join(snapshot_dir_name(store_name, ordinal));
        std::fs::create_dir_all(&dir).unwrap();
        let db = redb::Database::create(dir.join(format!("{store_name}.redb"))).unwrap();
        let write_txn = db.begin_write().unwrap();
        {
            for table in schema::upstream_tables() {
                let _ = write_txn.open_table(*table).unwrap();
            }
            let mut meta = write_txn.open_table(schema::META).unwrap();
            let bytes = bincode::serialize(&sequence).unwrap();
            meta.insert(schema::SEQUENCE_NUMBER_KEY, bytes.as_slice())
                .unwrap();
        }
        write_txn.commit().unwrap();
        dir
    }
}

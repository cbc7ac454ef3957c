//! Hot-swap manager for the mirrored metadata store
//!
//! Owns the one piece of shared mutable state in this crate: the
//! reference to the current snapshot handle. Queries go through
//! [`MetaMirrorManager::current_handle`], which clones the `Arc` — that
//! clone is the reader's lease, so an in-flight read keeps its store open
//! across a swap and the store closes when the last lease drops.

use crate::handle::{MirrorStoreHandle, MirrorStoreResult};
use crate::schema;
use crate::snapshot;
use gantry_common::MirrorConfig;
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

/// Manages the current mirrored store handle and its replacement on
/// snapshot ingest.
pub struct MetaMirrorManager {
    config: MirrorConfig,
    current: RwLock<Option<Arc<MirrorStoreHandle>>>,
    tables_initialized: AtomicBool,
    /// Superseded snapshot directories whose removal failed; retried on
    /// the next ingest.
    pending_cleanup: Mutex<Vec<PathBuf>>,
}

impl MetaMirrorManager {
    /// Create a manager with no store open yet
    #[must_use]
    pub fn new(config: MirrorConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
            tables_initialized: AtomicBool::new(false),
            pending_cleanup: Mutex::new(Vec::new()),
        }
    }

    /// Adopt the most recent previously ingested snapshot, if one exists.
    ///
    /// A manager started against an empty or missing snapshot root stays
    /// uninitialized with sequence number zero until the first ingest.
    pub fn start(&self) -> MirrorStoreResult<()> {
        let found = snapshot::find_most_recent_snapshot_dir(
            &self.config.snapshot_root,
            &self.config.store_name,
        )?;
        match found {
            Some(dir) => {
                info!("last known metadata snapshot: {}", dir.display());
                self.install_handle(&dir)
            }
            None => {
                info!(
                    "no previously ingested metadata snapshot under {}",
                    self.config.snapshot_root.display()
                );
                Ok(())
            }
        }
    }

    /// Replace the current store with one opened against
    /// `new_snapshot_dir`.
    ///
    /// On failure the previous handle stays authoritative and no state
    /// changes; on success the swap is a single atomic visibility change
    /// and the superseded snapshot's directory is removed afterwards,
    /// best-effort. Cleanup never runs before the swap has committed, so
    /// a failed ingest cannot delete data that is still current.
    pub fn ingest_snapshot(&self, new_snapshot_dir: &Path) -> MirrorStoreResult<()> {
        self.install_handle(new_snapshot_dir)
    }

    /// The current handle, or `None` before the first successful ingest.
    ///
    /// The returned `Arc` stays valid across later swaps; holding it is
    /// what keeps a superseded store open for in-flight reads.
    #[must_use]
    pub fn current_handle(&self) -> Option<Arc<MirrorStoreHandle>> {
        self.current.read().clone()
    }

    /// Latest durable sequence number of the current store, zero if no
    /// store is open yet
    #[must_use]
    pub fn current_sequence_number(&self) -> u64 {
        self.current_handle()
            .map_or(0, |handle| handle.latest_sequence_number())
    }

    /// Whether the mirrored table schema has been set up at least once
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.tables_initialized.load(Ordering::Acquire)
    }

    fn install_handle(&self, dir: &Path) -> MirrorStoreResult<()> {
        // Re-ingesting the snapshot that is already current is a no-op;
        // the live handle keeps its store file open and a second open of
        // the same file would be rejected.
        if let Some(current) = self.current_handle()
            && current.backing_dir() == dir
        {
            info!(
                "snapshot at {} is already the current store, nothing to do",
                dir.display()
            );
            return Ok(());
        }
        let handle =
            match MirrorStoreHandle::open(dir, &self.config.store_name, schema::upstream_tables()) {
                Ok(handle) => Arc::new(handle),
                Err(e) => {
                    error!(
                        "unable to open mirrored metadata store at {}: {}",
                        dir.display(),
                        e
                    );
                    return Err(e);
                }
            };
        info!(
            "created metadata store handle from snapshot at {}, sequence number {}",
            dir.display(),
            handle.latest_sequence_number()
        );
        self.tables_initialized.store(true, Ordering::Release);

        let previous = {
            let mut current = self.current.write();
            current.replace(handle)
        };
        if let Some(previous) = previous {
            // always a different directory, the no-op path returned early
            self.pending_cleanup
                .lock()
                .push(previous.backing_dir().to_path_buf());
            // dropping `previous` here releases our lease; the store
            // itself closes once in-flight readers drop theirs
        }
        self.reclaim_superseded();
        Ok(())
    }

    /// Remove superseded snapshot directories. Failures are non-fatal and
    /// retried on the next ingest; a directory already gone is a no-op.
    fn reclaim_superseded(&self) {
        let mut pending = self.pending_cleanup.lock();
        pending.retain(|dir| {
            if !dir.exists() {
                return false;
            }
            match std::fs::remove_dir_all(dir) {
                Ok(()) => {
                    info!("cleaned up superseded snapshot at {}", dir.display());
                    false
                }
                Err(e) => {
                    warn!(
                        "could not remove superseded snapshot {}: {}",
                        dir.display(),
                        e
                    );
                    true
                }
            }
        });
    }
}

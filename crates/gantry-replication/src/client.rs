//! Replication transfer client traits
//!
//! The wire protocol used to stream container bytes from a peer is a
//! collaborator, not part of this crate: implementations provide an
//! authenticated, optionally compressed streaming transfer. The fetcher
//! only relies on the session contract defined here.

use async_trait::async_trait;
use gantry_common::{ContainerId, CopyCompression, PeerNode, SecurityContext};
use std::path::{Path, PathBuf};

/// Errors surfaced by a replication transfer
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The channel to the peer could not be established or broke mid-stream
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer accepted the connection but rejected or failed the request
    #[error("remote error: {0}")]
    Remote(String),

    /// The transfer was cancelled from outside while in flight
    #[error("transfer cancelled")]
    Cancelled,

    /// Local filesystem failure while materializing the download
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// Whether this failure should abort the whole fetch rather than
    /// fail over to the next peer
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// An open transfer session scoped to a single peer.
///
/// Sessions must be closed after use regardless of the download outcome;
/// the fetcher treats close failures as non-fatal.
#[async_trait]
pub trait ReplicationSession: Send {
    /// Stream the container's bytes into `download_dir` and return the
    /// path of the materialized replica.
    async fn download(
        &mut self,
        container_id: ContainerId,
        download_dir: &Path,
    ) -> Result<PathBuf, TransferError>;

    /// Release the session's transport resources.
    async fn close(&mut self) -> Result<(), TransferError>;
}

/// Factory for transfer sessions.
#[async_trait]
pub trait ReplicationClient: Send + Sync {
    /// Open a session against the peer's replication endpoint.
    async fn open(
        &self,
        peer: &PeerNode,
        port: u16,
        security: &SecurityContext,
        compression: CopyCompression,
    ) -> Result<Box<dyn ReplicationSession>, TransferError>;
}

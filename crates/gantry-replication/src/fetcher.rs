//! Replica fetch with randomized peer failover
//!
//! Tries candidate peers one at a time until a download succeeds. The
//! candidate order is shuffled uniformly first: a download can succeed at
//! the transport layer and still fail integrity validation during import,
//! so a retry with a different random order has a chance of avoiding a
//! source serving corrupt data, and no single peer takes the brunt of
//! repeated recovery attempts.

use crate::client::{ReplicationClient, ReplicationSession, TransferError};
use gantry_common::config::default_container_copy_dir;
use gantry_common::{ContainerId, CopyCompression, PeerNode, SecurityContext};
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

/// Ordering applied to the candidate peer list before any attempt.
///
/// The production ordering is a uniform shuffle; deterministic orderings
/// can be substituted where reproducibility matters.
pub trait PeerOrdering: Send + Sync {
    /// Produce the attempt order for the given candidates.
    fn order(&self, peers: &[PeerNode]) -> Vec<PeerNode>;
}

/// Uniform random permutation of the candidates
#[derive(Clone, Copy, Debug, Default)]
pub struct ShuffledOrder;

impl PeerOrdering for ShuffledOrder {
    fn order(&self, peers: &[PeerNode]) -> Vec<PeerNode> {
        let mut shuffled = peers.to_vec();
        shuffled.shuffle(&mut rand::thread_rng());
        shuffled
    }
}

/// Attempts peers exactly in the order given
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedOrder;

impl PeerOrdering for FixedOrder {
    fn order(&self, peers: &[PeerNode]) -> Vec<PeerNode> {
        peers.to_vec()
    }
}

/// Errors reported by a replica fetch as a whole.
///
/// Both variants are expected, recoverable outcomes: the import pipeline
/// retries later from a refreshed peer list.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Every candidate peer was tried and none produced the container
    #[error("container {container_id} could not be downloaded from any of {attempts} peers")]
    AllSourcesFailed {
        container_id: ContainerId,
        attempts: usize,
    },

    /// An external cancellation was observed mid-transfer; no further
    /// peers were attempted
    #[error("container {container_id} download cancelled")]
    Cancelled { container_id: ContainerId },
}

impl From<FetchError> for gantry_common::Error {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::AllSourcesFailed { .. } => Self::Transfer(e.to_string()),
            FetchError::Cancelled { .. } => Self::Cancelled,
        }
    }
}

/// Downloads a missing container replica from the first peer that can
/// serve it.
pub struct ContainerReplicaFetcher {
    client: Arc<dyn ReplicationClient>,
    security: SecurityContext,
    ordering: Box<dyn PeerOrdering>,
}

impl ContainerReplicaFetcher {
    /// Create a fetcher with the default shuffled peer ordering
    pub fn new(client: Arc<dyn ReplicationClient>, security: SecurityContext) -> Self {
        Self {
            client,
            security,
            ordering: Box::new(ShuffledOrder),
        }
    }

    /// Replace the peer ordering policy
    #[must_use]
    pub fn with_ordering(mut self, ordering: Box<dyn PeerOrdering>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Fetch the container from one of the candidate peers.
    ///
    /// Peers are tried sequentially in shuffled order; the first success
    /// wins and later peers are never contacted. When `download_dir` is
    /// `None` the well-known staging directory under the process temp dir
    /// is used.
    pub async fn fetch(
        &self,
        container_id: ContainerId,
        peers: &[PeerNode],
        download_dir: Option<PathBuf>,
        compression: CopyCompression,
    ) -> Result<PathBuf, FetchError> {
        let download_dir = download_dir.unwrap_or_else(default_container_copy_dir);
        let ordered = self.ordering.order(peers);

        for peer in &ordered {
            match self
                .download_from(container_id, peer, &download_dir, compression)
                .await
            {
                Ok(path) => return Ok(path),
                Err(e) if e.is_cancellation() => {
                    warn!(
                        "download of container {} from {} cancelled, not trying further peers",
                        container_id, peer
                    );
                    return Err(FetchError::Cancelled { container_id });
                }
                Err(e) => {
                    warn!(
                        "container {} download from peer {} was unsuccessful, trying the next peer: {}",
                        container_id, peer, e
                    );
                }
            }
        }

        error!(
            "container {} could not be downloaded from any peer",
            container_id
        );
        Err(FetchError::AllSourcesFailed {
            container_id,
            attempts: ordered.len(),
        })
    }

    async fn download_from(
        &self,
        container_id: ContainerId,
        peer: &PeerNode,
        download_dir: &Path,
        compression: CopyCompression,
    ) -> Result<PathBuf, TransferError> {
        let port = peer.replication_port().ok_or_else(|| {
            TransferError::Transport(format!("peer {peer} advertises no replication port"))
        })?;

        let mut session = self
            .client
            .open(peer, port, &self.security, compression)
            .await?;

        match session.download(container_id, download_dir).await {
            Ok(path) => {
                // The replica is already materialized; release the session
                // off the return path.
                tokio::spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!("could not close replication session: {}", e);
                    }
                });
                Ok(path)
            }
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    warn!("could not close replication session: {}", close_err);
                }
                Err(e)
            }
        }
    }
}

//! Container replica recovery
//!
//! When a storage node is missing a local replica of a container, the
//! [`fetcher::ContainerReplicaFetcher`] pulls it from one of the peer nodes
//! known to hold a copy, failing over between peers in randomized order.
//! The wire-level transfer itself is behind the [`client`] traits.

pub mod client;
pub mod fetcher;

pub use client::{ReplicationClient, ReplicationSession, TransferError};
pub use fetcher::{ContainerReplicaFetcher, FetchError, FixedOrder, PeerOrdering, ShuffledOrder};

//! Core type definitions for Gantry
//!
//! This module defines the fundamental identifiers and descriptors used
//! throughout the recovery subsystem: container identifiers, peer node
//! descriptors, and the compression selector passed through to the
//! replication transfer layer.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

/// Unique identifier for a storage container
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From, Into,
)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Create a container ID from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({})", self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a peer storage node
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into)]
pub struct PeerId(Uuid);

impl PeerId {
    /// Generate a new random peer ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named service ports a peer node exposes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortName {
    /// Standalone data transfer endpoint
    Standalone,
    /// Consensus endpoint
    Ratis,
    /// Container replication endpoint
    Replication,
}

impl fmt::Display for PortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::Ratis => write!(f, "ratis"),
            Self::Replication => write!(f, "replication"),
        }
    }
}

/// Descriptor of a candidate peer node that may hold a container replica.
///
/// Immutable once constructed; supplied by the caller per fetch invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeerNode {
    /// Peer identity
    pub id: PeerId,
    /// Human-readable host name
    pub hostname: String,
    /// Network address
    pub ip_address: IpAddr,
    ports: HashMap<PortName, u16>,
}

impl PeerNode {
    /// Create a peer descriptor with no ports registered
    #[must_use]
    pub fn new(hostname: impl Into<String>, ip_address: IpAddr) -> Self {
        Self {
            id: PeerId::new(),
            hostname: hostname.into(),
            ip_address,
            ports: HashMap::new(),
        }
    }

    /// Register a named service port
    #[must_use]
    pub fn with_port(mut self, name: PortName, port: u16) -> Self {
        self.ports.insert(name, port);
        self
    }

    /// Look up a named service port
    #[must_use]
    pub fn port(&self, name: PortName) -> Option<u16> {
        self.ports.get(&name).copied()
    }

    /// The container replication port, if the peer advertises one
    #[must_use]
    pub fn replication_port(&self) -> Option<u16> {
        self.port(PortName::Replication)
    }
}

impl fmt::Display for PeerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.hostname, self.ip_address)
    }
}

/// Opaque security material used to authenticate replication transfers.
///
/// Carried through to the transfer client unchanged; never interpreted by
/// the recovery components themselves.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SecurityContext {
    token: Option<String>,
    tls_enabled: bool,
}

impl SecurityContext {
    /// Context with no credentials and no transport security
    #[must_use]
    pub fn insecure() -> Self {
        Self::default()
    }

    /// Attach an authentication token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Require TLS for the transfer channel
    #[must_use]
    pub const fn with_tls(mut self) -> Self {
        self.tls_enabled = true;
        self
    }

    /// The authentication token, if any
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether the transfer channel must use TLS
    #[must_use]
    pub const fn tls_enabled(&self) -> bool {
        self.tls_enabled
    }
}

/// Compression codec applied to container bytes on the wire.
///
/// A pass-through selector; codec internals live in the transfer client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyCompression {
    /// No compression
    #[default]
    NoCompression,
    /// gzip
    Gzip,
    /// LZ4 frame format
    Lz4,
    /// Snappy
    Snappy,
    /// Zstandard
    Zstd,
}

impl fmt::Display for CopyCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCompression => write!(f, "no_compression"),
            Self::Gzip => write!(f, "gzip"),
            Self::Lz4 => write!(f, "lz4"),
            Self::Snappy => write!(f, "snappy"),
            Self::Zstd => write!(f, "zstd"),
        }
    }
}

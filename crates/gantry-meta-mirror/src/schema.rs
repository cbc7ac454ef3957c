//! Upstream metadata schema shared with the mirror
//!
//! The mirror opens snapshot stores with exactly the table set the
//! upstream authority writes. The set lives in one place so an upstream
//! schema addition is inherited here by extending `UPSTREAM_TABLES`; the
//! store builder consumes the list and knows nothing about individual
//! tables.

use redb::TableDefinition;

/// All mirrored tables use string keys and bincode-encoded values.
pub type MirrorTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Container replicas known to the authority, keyed by container id
pub const CONTAINERS: MirrorTable = TableDefinition::new("containers");

/// Write pipelines, keyed by pipeline id
pub const PIPELINES: MirrorTable = TableDefinition::new("pipelines");

/// Blocks scheduled for deletion, keyed by transaction id
pub const DELETED_BLOCKS: MirrorTable = TableDefinition::new("deleted_blocks");

/// Store-level metadata written by the snapshot producer
pub const META: MirrorTable = TableDefinition::new("meta");

/// Key in [`META`] holding the latest durable log sequence number
pub const SEQUENCE_NUMBER_KEY: &str = "last_sequence_number";

const UPSTREAM_TABLES: &[MirrorTable] = &[CONTAINERS, PIPELINES, DELETED_BLOCKS, META];

/// The upstream authority's full table set, in registration order
#[must_use]
pub const fn upstream_tables() -> &'static [MirrorTable] {
    UPSTREAM_TABLES
}

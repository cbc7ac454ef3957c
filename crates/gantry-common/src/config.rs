//! Configuration types for Gantry
//!
//! This module defines the configuration structures for the recovery and
//! mirror components. Cluster-level configuration loading lives elsewhere;
//! these structs are plain data handed down by the node bootstrap.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the well-known staging subdirectory for downloaded container
/// replicas, resolved under the process temp directory when no explicit
/// download directory is configured.
pub const CONTAINER_COPY_DIR: &str = "container-copy";

/// The process-wide default staging directory for container downloads
#[must_use]
pub fn default_container_copy_dir() -> PathBuf {
    std::env::temp_dir().join(CONTAINER_COPY_DIR)
}

/// Configuration for container replica recovery
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Directory where downloaded replicas are staged before import.
    /// `None` selects the process-wide default.
    pub container_copy_dir: Option<PathBuf>,
}

impl RecoveryConfig {
    /// The staging directory downloads are written into
    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.container_copy_dir
            .clone()
            .unwrap_or_else(default_container_copy_dir)
    }
}

/// Configuration for the mirrored metadata store
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Root directory holding ingested snapshot subdirectories
    pub snapshot_root: PathBuf,
    /// Base name for snapshot directories and the store file within them
    pub store_name: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            snapshot_root: PathBuf::from("/var/lib/gantry/meta-mirror"),
            store_name: "meta_snapshot".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_dir_default() {
        let config = RecoveryConfig::default();
        assert_eq!(
            config.staging_dir(),
            std::env::temp_dir().join("container-copy")
        );
    }

    #[test]
    fn test_staging_dir_override() {
        let config = RecoveryConfig {
            container_copy_dir: Some(PathBuf::from("/data/staging")),
        };
        assert_eq!(config.staging_dir(), PathBuf::from("/data/staging"));
    }

    #[test]
    fn test_mirror_config_default() {
        let config = MirrorConfig::default();
        assert_eq!(config.store_name, "meta_snapshot");
    }
}

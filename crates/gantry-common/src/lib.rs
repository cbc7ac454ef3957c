//! Gantry Common - Shared types and utilities
//!
//! This crate provides the common types, error definitions, and configuration
//! structures used across the storage node recovery and maintenance
//! components.

pub mod config;
pub mod error;
pub mod types;

pub use config::{MirrorConfig, RecoveryConfig};
pub use error::{Error, Result};
pub use types::*;

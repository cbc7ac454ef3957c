//! Background block deletion scheduling
//!
//! Each GC cycle deletes at most a fixed budget of stale blocks. The
//! [`scheduler`] module decides which containers' pending blocks get that
//! budget, favoring the containers with the most reclaimable space.

pub mod scheduler;

pub use scheduler::{
    ContainerDeletionCandidate, DeletionSelection, DeletionWorkItem, select_for_deletion,
};

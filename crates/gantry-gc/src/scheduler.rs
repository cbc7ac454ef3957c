//! Top-N ordered container selection for block deletion
//!
//! Greedy, budget-bounded selection over a point-in-time snapshot of
//! pending-deletion counts. Containers with the most pending blocks are
//! drained first, which minimizes the number of cycles needed to work off
//! a backlog while the per-cycle budget bounds I/O amplification.

use gantry_common::ContainerId;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

/// A container considered for block deletion this cycle.
///
/// The pending count is a point-in-time snapshot taken by the caller;
/// background writers may move the live value while selection runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDeletionCandidate {
    /// The container holding the pending blocks
    pub container_id: ContainerId,
    /// Number of blocks awaiting deletion at snapshot time
    pub pending_deletion_blocks: u64,
}

impl ContainerDeletionCandidate {
    /// Create a candidate entry
    #[must_use]
    pub const fn new(container_id: ContainerId, pending_deletion_blocks: u64) -> Self {
        Self {
            container_id,
            pending_deletion_blocks,
        }
    }
}

/// One unit of deletion work: a container and how many of its pending
/// blocks this cycle will delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionWorkItem {
    /// The selected container
    pub candidate: ContainerDeletionCandidate,
    /// Blocks to delete from it this cycle; always > 0 and never more
    /// than the candidate's pending count
    pub blocks_to_delete: u64,
}

/// Ordered, budget-respecting selection for one deletion cycle
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSelection {
    items: Vec<DeletionWorkItem>,
}

impl DeletionSelection {
    /// The selected work items, highest pending count first
    #[must_use]
    pub fn items(&self) -> &[DeletionWorkItem] {
        &self.items
    }

    /// Total number of blocks across all items; never exceeds the budget
    /// the selection was made under
    #[must_use]
    pub fn total_blocks(&self) -> u64 {
        self.items.iter().map(|i| i.blocks_to_delete).sum()
    }

    /// Whether nothing was selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of selected containers
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Select containers for block deletion under a per-cycle block budget.
///
/// Candidates are walked in descending pending-count order (ties broken by
/// ascending container id, so repeated calls over identical input produce
/// identical output) and each takes `min(remaining budget, pending)` blocks
/// until the budget is exhausted. Containers with nothing pending are never
/// emitted.
#[must_use]
pub fn select_for_deletion(
    block_budget: u64,
    candidates: &HashMap<ContainerId, ContainerDeletionCandidate>,
) -> DeletionSelection {
    let mut ordered: Vec<ContainerDeletionCandidate> = candidates.values().copied().collect();
    ordered.sort_by_key(|c| (Reverse(c.pending_deletion_blocks), c.container_id));

    let mut items = Vec::new();
    let mut remaining = block_budget;
    for candidate in ordered {
        if remaining == 0 {
            break;
        }
        let blocks_to_delete = remaining.min(candidate.pending_deletion_blocks);
        if blocks_to_delete == 0 {
            // zero-pending candidates sort last; nothing left to take
            break;
        }
        debug!(
            "selected container {} for block deletion, pending: {}, taking: {}",
            candidate.container_id, candidate.pending_deletion_blocks, blocks_to_delete
        );
        remaining -= blocks_to_delete;
        items.push(DeletionWorkItem {
            candidate,
            blocks_to_delete,
        });
    }

    DeletionSelection { items }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(entries: &[(u64, u64)]) -> HashMap<ContainerId, ContainerDeletionCandidate> {
        entries
            .iter()
            .map(|&(id, pending)| {
                let id = ContainerId::new(id);
                (id, ContainerDeletionCandidate::new(id, pending))
            })
            .collect()
    }

    fn as_pairs(selection: &DeletionSelection) -> Vec<(u64, u64)> {
        selection
            .items()
            .iter()
            .map(|i| (i.candidate.container_id.value(), i.blocks_to_delete))
            .collect()
    }

    #[test]
    fn test_budget_smaller_than_backlog() {
        // {X:10, Y:30, Z:5} with budget 35 -> [(Y,30), (X,5)], Z excluded
        let candidates = candidates(&[(1, 10), (2, 30), (3, 5)]);
        let selection = select_for_deletion(35, &candidates);
        assert_eq!(as_pairs(&selection), vec![(2, 30), (1, 5)]);
        assert_eq!(selection.total_blocks(), 35);
    }

    #[test]
    fn test_budget_exact_fit() {
        // budget 45 consumes the whole backlog in descending order
        let candidates = candidates(&[(1, 10), (2, 30), (3, 5)]);
        let selection = select_for_deletion(45, &candidates);
        assert_eq!(as_pairs(&selection), vec![(2, 30), (1, 10), (3, 5)]);
        assert_eq!(selection.total_blocks(), 45);
    }

    #[test]
    fn test_budget_larger_than_backlog() {
        let candidates = candidates(&[(1, 10), (2, 30)]);
        let selection = select_for_deletion(1000, &candidates);
        assert_eq!(selection.total_blocks(), 40);
    }

    #[test]
    fn test_budget_and_per_container_caps_hold() {
        let candidates = candidates(&[(1, 7), (2, 19), (3, 3), (4, 0), (5, 42)]);
        for budget in [0, 1, 5, 20, 50, 100] {
            let selection = select_for_deletion(budget, &candidates);
            assert!(selection.total_blocks() <= budget);
            for item in selection.items() {
                assert!(item.blocks_to_delete <= item.candidate.pending_deletion_blocks);
                assert!(item.blocks_to_delete > 0);
            }
        }
    }

    #[test]
    fn test_zero_pending_candidates_never_emitted() {
        let candidates = candidates(&[(1, 0), (2, 4), (3, 0)]);
        let selection = select_for_deletion(10, &candidates);
        assert_eq!(as_pairs(&selection), vec![(2, 4)]);
    }

    #[test]
    fn test_zero_budget_selects_nothing() {
        let candidates = candidates(&[(1, 10)]);
        let selection = select_for_deletion(0, &candidates);
        assert!(selection.is_empty());
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn test_empty_candidates() {
        let selection = select_for_deletion(10, &HashMap::new());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_tie_break_is_stable() {
        let candidates = candidates(&[(9, 5), (2, 5), (5, 5)]);
        let first = select_for_deletion(12, &candidates);
        // equal pending counts break ties by ascending container id
        assert_eq!(as_pairs(&first), vec![(2, 5), (5, 5), (9, 2)]);
        for _ in 0..10 {
            assert_eq!(select_for_deletion(12, &candidates), first);
        }
    }
}

//! Plan summaries for display

use crate::types::Operation;
use std::collections::BTreeMap;

/// Plan summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSummary {
    /// Groups created, members added to groups, accounts provisioned
    pub additions: usize,
    /// Members removed from groups, accounts deprovisioned
    pub removals: usize,
    /// Groups renamed
    pub modifications: usize,
}

impl PlanSummary {
    /// Create a summary from a list of operations
    pub fn from_operations(operations: &[Operation]) -> Self {
        let mut summary = Self::default();
        for op in operations {
            if op.is_addition() {
                summary.additions += 1;
            } else if op.is_removal() {
                summary.removals += 1;
            } else {
                summary.modifications += 1;
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group operations by operation name
pub fn group_by_name(operations: &[Operation]) -> BTreeMap<&'static str, Vec<&Operation>> {
    let mut groups: BTreeMap<&'static str, Vec<&Operation>> = BTreeMap::new();
    for op in operations {
        groups.entry(op.name()).or_default().push(op);
    }
    groups
}

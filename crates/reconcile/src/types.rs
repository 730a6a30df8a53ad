//! Core types for directory reconciliation

use crate::report::Report;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The group a membership change applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRef {
    /// An existing target group.
    Id(String),
    /// The group a `GroupsCreate` earlier in the same plan will create.
    Created { correlation_id: String },
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Created { correlation_id } => write!(f, "new:{correlation_id}"),
        }
    }
}

/// A side-effecting change to the target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation")]
pub enum Operation {
    GroupsCreate {
        name: String,
        correlation_id: String,
    },
    GroupsUpdate {
        group_id: String,
        new_name: String,
    },
    GroupsMembersAdd {
        group: GroupRef,
        email: String,
    },
    GroupsMembersRemove {
        group_id: String,
        email: String,
    },
    MembersAdd {
        email: String,
        given_name: String,
        surname: String,
    },
    MembersRemove {
        email: String,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GroupsCreate { .. } => "GroupsCreate",
            Self::GroupsUpdate { .. } => "GroupsUpdate",
            Self::GroupsMembersAdd { .. } => "GroupsMembersAdd",
            Self::GroupsMembersRemove { .. } => "GroupsMembersRemove",
            Self::MembersAdd { .. } => "MembersAdd",
            Self::MembersRemove { .. } => "MembersRemove",
        }
    }

    /// Arguments in call order.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::GroupsCreate {
                name,
                correlation_id,
            } => vec![name.clone(), correlation_id.clone()],
            Self::GroupsUpdate { group_id, new_name } => vec![group_id.clone(), new_name.clone()],
            Self::GroupsMembersAdd { group, email } => vec![group.to_string(), email.clone()],
            Self::GroupsMembersRemove { group_id, email } => vec![group_id.clone(), email.clone()],
            Self::MembersAdd {
                email,
                given_name,
                surname,
            } => vec![email.clone(), given_name.clone(), surname.clone()],
            Self::MembersRemove { email } => vec![email.clone()],
        }
    }

    /// Whether the operation touches groups or accounts.
    pub fn target(&self) -> &'static str {
        match self {
            Self::GroupsCreate { .. }
            | Self::GroupsUpdate { .. }
            | Self::GroupsMembersAdd { .. }
            | Self::GroupsMembersRemove { .. } => "groups",
            Self::MembersAdd { .. } | Self::MembersRemove { .. } => "members",
        }
    }

    pub fn is_addition(&self) -> bool {
        matches!(
            self,
            Self::GroupsCreate { .. } | Self::GroupsMembersAdd { .. } | Self::MembersAdd { .. }
        )
    }

    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            Self::GroupsMembersRemove { .. } | Self::MembersRemove { .. }
        )
    }

    pub fn is_modification(&self) -> bool {
        matches!(self, Self::GroupsUpdate { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}]", self.name(), self.args().join(" "))
    }
}

/// Result of applying one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// Entity was created
    Created,
    /// Entity was modified
    Modified,
    /// Entity was removed
    Removed,
    /// Apply failed
    Failed { error: String },
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Per-entity successes and failures, in order
    pub report: Report,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.removed
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.report.has_failures()
    }

    /// Total number of operations processed
    pub fn total(&self) -> usize {
        self.created + self.modified + self.removed + self.skipped + self.failed
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: ExecuteSummary) {
        self.created += other.created;
        self.modified += other.modified;
        self.removed += other.removed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.report.merge(other.report);
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Operations go to a recording connector; no confirmation is asked
    pub dry_run: bool,
}

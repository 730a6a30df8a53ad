//! Plans - ordered operations plus what could not be planned

use crate::report::Report;
use crate::types::Operation;

/// Operations in application order, with reconcile-time failures
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub operations: Vec<Operation>,
    /// Failures recorded while planning (e.g. unknown groups)
    pub report: Report,
}

impl Plan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn extend(&mut self, operations: impl IntoIterator<Item = Operation>) {
        self.operations.extend(operations);
    }

    /// Record something that could not be planned
    pub fn failure(&mut self, message: impl Into<String>) {
        self.report.failure(message);
    }

    /// Append another plan after this one
    pub fn merge(&mut self, other: Plan) {
        self.operations.extend(other.operations);
        self.report.merge(other.report);
    }

    /// Filter plan to only include operations matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&Operation) -> bool,
    {
        Self {
            operations: self.operations.into_iter().filter(|op| predicate(op)).collect(),
            report: self.report,
        }
    }

    /// Filter plan to only include operations matching a target pattern
    ///
    /// Target format: "kind" or "kind:entity", where kind is `groups`,
    /// `members`, or an operation name, and entity is matched against the
    /// operation's arguments.
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (kind, entity) = parse_target(t);
                self.filter(|op| matches_filter(op, kind.as_deref(), entity.as_deref()))
            }
        }
    }

    /// Total number of operations in the plan
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if plan has no operations
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Parse a target string like "kind:entity" into (kind, entity)
fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    match target.split_once(':') {
        None => (Some(target.to_string()), None),
        Some(("", entity)) => (None, Some(entity.to_string())),
        Some((kind, entity)) => (Some(kind.to_string()), Some(entity.to_string())),
    }
}

/// Check if an operation matches the filter criteria
fn matches_filter(operation: &Operation, kind: Option<&str>, entity: Option<&str>) -> bool {
    if let Some(k) = kind {
        let matches_kind = match k {
            "groups" | "group" => operation.target() == "groups",
            "members" | "users" | "accounts" => operation.target() == "members",
            _ => operation.name().eq_ignore_ascii_case(k),
        };
        if !matches_kind {
            return false;
        }
    }

    if let Some(e) = entity
        && !operation.args().iter().any(|arg| arg.contains(e))
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupRef;

    fn sample_plan() -> Plan {
        let mut plan = Plan::new();
        plan.push(Operation::MembersAdd {
            email: "a@example.com".to_string(),
            given_name: "Ann".to_string(),
            surname: "Lee".to_string(),
        });
        plan.push(Operation::GroupsMembersAdd {
            group: GroupRef::Id("g:1".to_string()),
            email: "a@example.com".to_string(),
        });
        plan.push(Operation::GroupsMembersRemove {
            group_id: "g:2".to_string(),
            email: "b@example.com".to_string(),
        });
        plan
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("groups"), (Some("groups".to_string()), None));
        assert_eq!(
            parse_target("groups:g:1"),
            (Some("groups".to_string()), Some("g:1".to_string()))
        );
        assert_eq!(parse_target(":a@example.com"), (None, Some("a@example.com".to_string())));
    }

    #[test]
    fn test_filter_by_kind() {
        assert_eq!(sample_plan().filter_by_target(Some("members")).len(), 1);
        assert_eq!(sample_plan().filter_by_target(Some("groups")).len(), 2);
        assert_eq!(sample_plan().filter_by_target(Some("groupsmembersremove")).len(), 1);
        assert_eq!(sample_plan().filter_by_target(None).len(), 3);
    }

    #[test]
    fn test_filter_by_entity() {
        let plan = sample_plan().filter_by_target(Some(":a@example.com"));
        assert_eq!(plan.len(), 2);

        let plan = sample_plan().filter_by_target(Some("groups:g:2"));
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_merge_keeps_failures() {
        let mut plan = sample_plan();
        let mut other = Plan::new();
        other.failure("source group not found: ops@example.com");
        plan.merge(other);

        assert_eq!(plan.len(), 3);
        assert!(plan.report.has_failures());
    }
}

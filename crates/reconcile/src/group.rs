//! Group reconciliation.
//!
//! Converges one target group toward one source group. The target group is
//! found through its correlation id; membership is compared after dropping
//! source members that have no target account yet.

use crate::error::ReconcileError;
use crate::planner::Plan;
use crate::types::{GroupRef, Operation};
use directory::{Account, Group, SourceDirectory, TargetDirectory};
use std::collections::HashSet;

pub struct GroupReconciler<'a> {
    source: &'a SourceDirectory,
    target: &'a TargetDirectory,
}

impl<'a> GroupReconciler<'a> {
    pub fn new(source: &'a SourceDirectory, target: &'a TargetDirectory) -> Self {
        Self { source, target }
    }

    /// Operations that bring the target group for `key` in line with the source.
    pub fn reconcile(&self, key: &str) -> Result<Vec<Operation>, ReconcileError> {
        let source_group = self
            .source
            .group(key)
            .ok_or_else(|| ReconcileError::GroupNotFound {
                key: key.to_string(),
            })?;

        let present = self.present_members(source_group);
        let ops = match self.target.find_by_correlation(&source_group.group_id) {
            None => create_group(source_group, &present),
            Some(target_group) => update_group(source_group, target_group, &present),
        };

        log::debug!(
            "Group {}: {} operation(s) for {} source member(s), {} provisioned",
            key,
            ops.len(),
            source_group.members.len(),
            present.len()
        );
        Ok(ops)
    }

    /// Reconcile every key; unknown groups are recorded as failures.
    pub fn reconcile_all<I, S>(&self, keys: I) -> Plan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut plan = Plan::new();
        for key in keys {
            match self.reconcile(key.as_ref()) {
                Ok(ops) => plan.extend(ops),
                Err(e) => {
                    log::warn!("{}", e);
                    plan.failure(e.to_string());
                }
            }
        }
        plan
    }

    /// Source members that already have a target account, in source order.
    fn present_members<'g>(&self, source_group: &'g Group) -> Vec<&'g Account> {
        source_group
            .members
            .iter()
            .filter(|member| {
                let present = self.target.contains_account(&member.email);
                if !present {
                    log::trace!(
                        "Skipping {} in {}: no target account",
                        member.email,
                        source_group.group_email
                    );
                }
                present
            })
            .collect()
    }
}

fn create_group(source_group: &Group, present: &[&Account]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(present.len() + 1);
    ops.push(Operation::GroupsCreate {
        name: source_group.group_name.clone(),
        correlation_id: source_group.group_id.clone(),
    });
    ops.extend(present.iter().map(|member| Operation::GroupsMembersAdd {
        group: GroupRef::Created {
            correlation_id: source_group.group_id.clone(),
        },
        email: member.email.clone(),
    }));
    ops
}

fn update_group(
    source_group: &Group,
    target_group: &Group,
    present: &[&Account],
) -> Vec<Operation> {
    let mut ops = Vec::new();

    if source_group.group_name != target_group.group_name {
        ops.push(Operation::GroupsUpdate {
            group_id: target_group.group_id.clone(),
            new_name: source_group.group_name.clone(),
        });
    }

    let wanted: HashSet<&str> = present.iter().map(|m| m.email.as_str()).collect();

    ops.extend(
        present
            .iter()
            .filter(|m| !target_group.members.contains(&m.email))
            .map(|m| Operation::GroupsMembersAdd {
                group: GroupRef::Id(target_group.group_id.clone()),
                email: m.email.clone(),
            }),
    );
    ops.extend(
        target_group
            .members
            .iter()
            .filter(|m| !wanted.contains(m.email.as_str()))
            .map(|m| Operation::GroupsMembersRemove {
                group_id: target_group.group_id.clone(),
                email: m.email.clone(),
            }),
    );

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts(emails: &[&str]) -> Vec<Account> {
        emails.iter().map(|e| Account::new(*e)).collect()
    }

    fn source_with(name: &str, members: &[&str]) -> SourceDirectory {
        SourceDirectory::from_parts(
            Vec::new(),
            [Group::new("eng@example.com", name, "eng@example.com")
                .with_members(accounts(members))],
        )
    }

    fn target_with(account_emails: &[&str], name: &str, members: &[&str]) -> TargetDirectory {
        let group = Group::new("g:1", name, "")
            .with_correlation_id("eng@example.com")
            .with_members(accounts(members));
        TargetDirectory::new(accounts(account_emails), [group]).unwrap()
    }

    fn target_without_group(account_emails: &[&str]) -> TargetDirectory {
        TargetDirectory::new(accounts(account_emails), Vec::new()).unwrap()
    }

    fn add(group: GroupRef, email: &str) -> Operation {
        Operation::GroupsMembersAdd {
            group,
            email: email.to_string(),
        }
    }

    fn existing() -> GroupRef {
        GroupRef::Id("g:1".to_string())
    }

    #[test]
    fn test_in_sync_group_has_no_operations() {
        let source = source_with("Engineering", &["a@x", "b@x"]);
        let target = target_with(&["a@x", "b@x"], "Engineering", &["b@x", "a@x"]);

        let ops = GroupReconciler::new(&source, &target).reconcile("eng@example.com").unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_add_and_remove_members() {
        let source = source_with("Engineering", &["a@x", "b@x"]);
        let target = target_with(&["a@x", "b@x", "c@x"], "Engineering", &["a@x", "c@x"]);

        let ops = GroupReconciler::new(&source, &target).reconcile("eng@example.com").unwrap();
        assert_eq!(
            ops,
            vec![
                add(existing(), "b@x"),
                Operation::GroupsMembersRemove {
                    group_id: "g:1".to_string(),
                    email: "c@x".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unprovisioned_members_are_never_added() {
        let source = source_with("Engineering", &["a@x", "ghost@x"]);
        let target = target_with(&["a@x"], "Engineering", &[]);

        let ops = GroupReconciler::new(&source, &target).reconcile("eng@example.com").unwrap();
        assert_eq!(ops, vec![add(existing(), "a@x")]);
    }

    #[test]
    fn test_target_member_without_account_is_removed() {
        let source = source_with("Engineering", &["a@x"]);
        let target = target_with(&["a@x"], "Engineering", &["a@x", "gone@x"]);

        let ops = GroupReconciler::new(&source, &target).reconcile("eng@example.com").unwrap();
        assert_eq!(
            ops,
            vec![Operation::GroupsMembersRemove {
                group_id: "g:1".to_string(),
                email: "gone@x".to_string(),
            }]
        );
    }

    #[test]
    fn test_create_when_no_correlated_group() {
        let source = source_with("Engineering", &["a@x", "ghost@x", "b@x"]);
        let target = target_without_group(&["a@x", "b@x"]);

        let ops = GroupReconciler::new(&source, &target).reconcile("eng@example.com").unwrap();
        let created = GroupRef::Created {
            correlation_id: "eng@example.com".to_string(),
        };
        assert_eq!(
            ops,
            vec![
                Operation::GroupsCreate {
                    name: "Engineering".to_string(),
                    correlation_id: "eng@example.com".to_string(),
                },
                add(created.clone(), "a@x"),
                add(created, "b@x"),
            ]
        );
    }

    #[test]
    fn test_create_empty_group() {
        let source = source_with("Engineering", &[]);
        let target = target_without_group(&[]);

        let ops = GroupReconciler::new(&source, &target).reconcile("eng@example.com").unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].name(), "GroupsCreate");
    }

    #[test]
    fn test_rename_only() {
        let source = source_with("Engineering", &["a@x"]);
        let target = target_with(&["a@x"], "Eng (old)", &["a@x"]);

        let ops = GroupReconciler::new(&source, &target).reconcile("eng@example.com").unwrap();
        assert_eq!(
            ops,
            vec![Operation::GroupsUpdate {
                group_id: "g:1".to_string(),
                new_name: "Engineering".to_string(),
            }]
        );
    }

    #[test]
    fn test_uncorrelated_target_group_is_ignored() {
        let source = source_with("Engineering", &["a@x"]);
        let target = TargetDirectory::new(
            accounts(&["a@x"]),
            [Group::new("g:9", "Engineering", "").with_members(accounts(&["a@x"]))],
        )
        .unwrap();

        let ops = GroupReconciler::new(&source, &target).reconcile("eng@example.com").unwrap();
        assert_eq!(ops[0].name(), "GroupsCreate");
    }

    #[test]
    fn test_unknown_group_is_an_error() {
        let source = source_with("Engineering", &[]);
        let target = target_without_group(&[]);

        let err = GroupReconciler::new(&source, &target).reconcile("ops@example.com").unwrap_err();
        assert_eq!(
            err,
            ReconcileError::GroupNotFound {
                key: "ops@example.com".to_string()
            }
        );
    }

    #[test]
    fn test_reconcile_all_continues_past_unknown_group() {
        let source = source_with("Engineering", &["a@x"]);
        let target = target_with(&["a@x"], "Engineering", &[]);

        let plan = GroupReconciler::new(&source, &target)
            .reconcile_all(["ops@example.com", "eng@example.com"]);

        assert_eq!(plan.operations, vec![add(existing(), "a@x")]);
        assert_eq!(plan.report.failures(), ["source group not found: ops@example.com"]);
    }
}

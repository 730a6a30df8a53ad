//! Execution engine - applies a plan through a connector, one operation at a time

use crate::connector::Connector;
use crate::context::{ConfirmCallback, ProgressCallback};
use crate::planner::Plan;
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary, GroupRef, Operation};
use anyhow::Result;
use std::collections::HashMap;

/// Execute a plan with the given options and callbacks
///
/// Operations run in plan order. A failing operation is recorded and the
/// batch continues; member additions on a group whose creation failed are
/// skipped. Live runs (`dry_run == false`) ask `confirm` first.
///
/// # Returns
/// Summary of execution results, including the plan's own failures
pub fn execute<P, C>(
    plan: Plan,
    connector: &mut dyn Connector,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let Plan { operations, report } = plan;
    let mut summary = ExecuteSummary {
        report,
        ..Default::default()
    };

    if operations.is_empty() {
        return Ok(summary);
    }

    if !opts.dry_run && !confirm.confirm("Apply changes?")? {
        summary.skipped = operations.len();
        return Ok(summary);
    }

    let mut created: HashMap<String, String> = HashMap::new();
    progress.on_start(operations.len());
    for operation in &operations {
        progress.on_operation_start(operation);
        let result = apply_operation(operation, connector, &mut created);
        record_result(&mut summary, operation, &result);
        progress.on_operation_complete(operation, &result);
    }
    progress.on_complete();

    Ok(summary)
}

/// Simple execution without callbacks
pub fn execute_simple(
    plan: Plan,
    connector: &mut dyn Connector,
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary> {
    use crate::context::{AutoConfirm, NoProgress};

    execute(plan, connector, opts, &mut NoProgress, &mut AutoConfirm)
}

/// Apply a single operation
fn apply_operation(
    operation: &Operation,
    connector: &mut dyn Connector,
    created: &mut HashMap<String, String>,
) -> ApplyResult {
    let outcome = match operation {
        Operation::GroupsCreate {
            name,
            correlation_id,
        } => match connector.groups_create(name, correlation_id) {
            Ok(Some(id)) if !id.is_empty() => {
                created.insert(correlation_id.clone(), id);
                Ok(ApplyResult::Created)
            }
            Ok(_) => Err(anyhow::anyhow!("target returned no group id")),
            Err(e) => Err(e),
        },
        Operation::GroupsUpdate { group_id, new_name } => connector
            .groups_update(group_id, new_name)
            .map(|()| ApplyResult::Modified),
        Operation::GroupsMembersAdd { group, email } => {
            let group_id = match group {
                GroupRef::Id(id) => id.as_str(),
                GroupRef::Created { correlation_id } => match created.get(correlation_id) {
                    Some(id) => id.as_str(),
                    None => {
                        return ApplyResult::Skipped {
                            reason: format!("group {correlation_id} was not created"),
                        };
                    }
                },
            };
            connector
                .groups_members_add(group_id, email)
                .map(|()| ApplyResult::Created)
        }
        Operation::GroupsMembersRemove { group_id, email } => connector
            .groups_members_remove(group_id, email)
            .map(|()| ApplyResult::Removed),
        Operation::MembersAdd {
            email,
            given_name,
            surname,
        } => connector
            .members_add(email, given_name, surname)
            .map(|()| ApplyResult::Created),
        Operation::MembersRemove { email } => {
            connector.members_remove(email).map(|()| ApplyResult::Removed)
        }
    };

    outcome.unwrap_or_else(|e| ApplyResult::Failed {
        error: format!("{e:#}"),
    })
}

fn record_result(summary: &mut ExecuteSummary, operation: &Operation, result: &ApplyResult) {
    summary.add_result(result);
    match result {
        ApplyResult::Failed { error } => {
            log::warn!("{} failed: {}", operation, error);
            summary.report.failure(format!("{operation}: {error}"));
        }
        ApplyResult::Skipped { reason } => {
            log::warn!("{} skipped: {}", operation, reason);
            summary.report.failure(format!("{operation}: skipped, {reason}"));
        }
        _ => summary.report.success(operation.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::DryRunConnector;
    use crate::context::{AutoConfirm, AutoDecline, NoProgress};

    /// Connector that fails selected calls and records the rest.
    #[derive(Default)]
    struct FlakyConnector {
        create_returns: Option<String>,
        fail_emails: Vec<String>,
        calls: Vec<String>,
    }

    impl Connector for FlakyConnector {
        fn groups_create(&mut self, name: &str, _correlation_id: &str) -> Result<Option<String>> {
            self.calls.push(format!("create {name}"));
            Ok(self.create_returns.clone())
        }

        fn groups_update(&mut self, group_id: &str, new_name: &str) -> Result<()> {
            self.calls.push(format!("update {group_id} {new_name}"));
            Ok(())
        }

        fn groups_members_add(&mut self, group_id: &str, email: &str) -> Result<()> {
            if self.fail_emails.iter().any(|e| e == email) {
                anyhow::bail!("rejected {email}");
            }
            self.calls.push(format!("add {group_id} {email}"));
            Ok(())
        }

        fn groups_members_remove(&mut self, group_id: &str, email: &str) -> Result<()> {
            self.calls.push(format!("remove {group_id} {email}"));
            Ok(())
        }

        fn members_add(&mut self, email: &str, _given_name: &str, _surname: &str) -> Result<()> {
            if self.fail_emails.iter().any(|e| e == email) {
                anyhow::bail!("rejected {email}");
            }
            self.calls.push(format!("provision {email}"));
            Ok(())
        }

        fn members_remove(&mut self, email: &str) -> Result<()> {
            self.calls.push(format!("deprovision {email}"));
            Ok(())
        }
    }

    fn creation_plan() -> Plan {
        let created = GroupRef::Created {
            correlation_id: "eng@example.com".to_string(),
        };
        let mut plan = Plan::new();
        plan.push(Operation::GroupsCreate {
            name: "Engineering".to_string(),
            correlation_id: "eng@example.com".to_string(),
        });
        plan.push(Operation::GroupsMembersAdd {
            group: created.clone(),
            email: "a@example.com".to_string(),
        });
        plan.push(Operation::GroupsMembersAdd {
            group: created,
            email: "b@example.com".to_string(),
        });
        plan
    }

    fn live() -> ExecuteOptions {
        ExecuteOptions { dry_run: false }
    }

    #[test]
    fn test_execute_empty_plan() {
        let mut connector = DryRunConnector::new();
        let summary = execute(
            Plan::new(),
            &mut connector,
            &live(),
            &mut NoProgress,
            &mut AutoDecline,
        )
        .unwrap();

        assert_eq!(summary.total(), 0);
        assert!(summary.report.is_empty());
    }

    #[test]
    fn test_dry_run_resolves_created_group() {
        let mut connector = DryRunConnector::new();
        let opts = ExecuteOptions { dry_run: true };
        let summary = execute(
            creation_plan(),
            &mut connector,
            &opts,
            &mut NoProgress,
            &mut AutoDecline,
        )
        .unwrap();

        assert_eq!(summary.created, 3);
        assert_eq!(
            connector.history(),
            [
                "[GroupsCreate] [Engineering eng@example.com]",
                "[GroupsMembersAdd] [mock-eng@example.com a@example.com]",
                "[GroupsMembersAdd] [mock-eng@example.com b@example.com]",
            ]
        );
        assert_eq!(summary.report.successes().len(), 3);
    }

    #[test]
    fn test_create_without_id_skips_dependents() {
        let mut connector = FlakyConnector::default();
        let summary = execute_simple(creation_plan(), &mut connector, &live()).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(connector.calls, vec!["create Engineering"]);
        assert_eq!(summary.report.failures().len(), 3);
        assert!(summary.report.failures()[1].contains("was not created"));
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let mut connector = FlakyConnector {
            create_returns: Some("g:42".to_string()),
            fail_emails: vec!["a@example.com".to_string()],
            ..Default::default()
        };
        let summary = execute_simple(creation_plan(), &mut connector, &live()).unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            connector.calls,
            vec!["create Engineering", "add g:42 b@example.com"]
        );
        assert!(summary.report.failures()[0].contains("rejected a@example.com"));
    }

    #[test]
    fn test_declined_confirmation_applies_nothing() {
        let mut connector = FlakyConnector::default();
        let summary = execute(
            creation_plan(),
            &mut connector,
            &live(),
            &mut NoProgress,
            &mut AutoDecline,
        )
        .unwrap();

        assert_eq!(summary.skipped, 3);
        assert!(connector.calls.is_empty());
    }

    #[test]
    fn test_plan_failures_carry_into_summary() {
        let mut plan = Plan::new();
        plan.failure("source group not found: ops@example.com");
        plan.push(Operation::MembersRemove {
            email: "z@example.com".to_string(),
        });

        let mut connector = FlakyConnector::default();
        let summary = execute(plan, &mut connector, &live(), &mut NoProgress, &mut AutoConfirm)
            .unwrap();

        assert_eq!(summary.removed, 1);
        assert_eq!(summary.report.failures().len(), 1);
        assert_eq!(summary.report.successes(), ["[MembersRemove] [z@example.com]"]);
        assert!(!summary.is_success());
    }
}

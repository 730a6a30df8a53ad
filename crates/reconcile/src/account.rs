//! Account provisioning and deprovisioning.

use crate::types::Operation;
use directory::{EmailResolver, SourceDirectory, TargetDirectory};

pub struct AccountReconciler<'a> {
    source: &'a SourceDirectory,
    target: &'a TargetDirectory,
}

impl<'a> AccountReconciler<'a> {
    pub fn new(source: &'a SourceDirectory, target: &'a TargetDirectory) -> Self {
        Self { source, target }
    }

    /// `MembersAdd` for every source account missing from the target.
    pub fn provision(&self) -> Vec<Operation> {
        let ops: Vec<Operation> = self
            .source
            .accounts()
            .values()
            .filter(|a| !self.target.contains_account(&a.email))
            .map(|a| Operation::MembersAdd {
                email: a.email.clone(),
                given_name: a.given_name.clone(),
                surname: a.surname.clone(),
            })
            .collect();
        log::info!(
            "Provision: {} source account(s), {} to add",
            self.source.accounts().len(),
            ops.len()
        );
        ops
    }

    /// `MembersRemove` for every target account unknown to the source.
    ///
    /// Candidates are target accounts whose address the source snapshot does
    /// not know as a primary address, an alias or a group address. Each
    /// candidate is checked again with `reconfirm`, an independent listing;
    /// only addresses unknown to both are removed. A failing check aborts
    /// deprovisioning.
    pub fn deprovision(&self, reconfirm: &dyn EmailResolver) -> directory::Result<Vec<Operation>> {
        let candidates: Vec<&str> = self
            .target
            .accounts()
            .keys()
            .map(String::as_str)
            .filter(|email| self.source.email_kind(email).is_none())
            .collect();
        log::debug!("Deprovision: {} candidate(s) before reconfirm", candidates.len());

        let mut ops = Vec::new();
        for email in candidates {
            if reconfirm.email_exists(email)? {
                log::debug!("Keeping {}: still known to the source directory", email);
                continue;
            }
            ops.push(Operation::MembersRemove {
                email: email.to_string(),
            });
        }

        log::info!(
            "Deprovision: {} target account(s), {} to remove",
            self.target.accounts().len(),
            ops.len()
        );
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory::{Account, EmailIndex, Group, RawUser};

    fn target(emails: &[&str]) -> TargetDirectory {
        TargetDirectory::new(emails.iter().map(|e| Account::new(*e)), Vec::new()).unwrap()
    }

    struct FailingResolver;

    impl EmailResolver for FailingResolver {
        fn email_exists(&self, _email: &str) -> directory::Result<bool> {
            Err(directory::Error::Provider("lookup failed".to_string()))
        }
    }

    #[test]
    fn test_provision_carries_names() {
        let source = SourceDirectory::from_parts(
            [
                Account::with_name("a@x", "Ann", "Lee"),
                Account::with_name("b@x", "Bo", "Kim"),
            ],
            Vec::new(),
        );
        let target = target(&["a@x"]);

        let ops = AccountReconciler::new(&source, &target).provision();
        assert_eq!(
            ops,
            vec![Operation::MembersAdd {
                email: "b@x".to_string(),
                given_name: "Bo".to_string(),
                surname: "Kim".to_string(),
            }]
        );
    }

    #[test]
    fn test_provision_nothing_missing() {
        let source = SourceDirectory::from_parts([Account::new("a@x")], Vec::new());
        let target = target(&["a@x", "extra@x"]);
        assert!(AccountReconciler::new(&source, &target).provision().is_empty());
    }

    #[test]
    fn test_deprovision_unknown_account() {
        let source = SourceDirectory::from_parts([Account::new("a@x")], Vec::new());
        let target = target(&["a@x", "gone@x"]);

        let ops = AccountReconciler::new(&source, &target).deprovision(&source).unwrap();
        assert_eq!(
            ops,
            vec![Operation::MembersRemove {
                email: "gone@x".to_string()
            }]
        );
    }

    #[test]
    fn test_deprovision_keeps_primary_alias_and_group_addresses() {
        let source = SourceDirectory::from_parts(
            [Account::new("a@x")],
            [Group::new("team@x", "Team", "team@x")],
        )
        .with_alias("ann@x");
        let target = target(&["a@x", "ann@x", "team@x"]);

        let ops = AccountReconciler::new(&source, &target).deprovision(&source).unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_deprovision_keeps_snapshot_alias_when_reconfirm_is_partial() {
        let source = SourceDirectory::from_parts([Account::new("a@x")], Vec::new())
            .with_alias("ann@x");
        let target = target(&["a@x", "ann@x"]);

        let ops = AccountReconciler::new(&source, &target)
            .deprovision(&EmailIndex::default())
            .unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_deprovision_reconfirms_with_independent_index() {
        let source = SourceDirectory::from_parts([Account::new("a@x")], Vec::new());
        let target = target(&["a@x", "late@x", "gone@x"]);
        let fresh = EmailIndex::from_listing(&[RawUser::new("late@x", "Late", "Hire")], &[]);

        let ops = AccountReconciler::new(&source, &target).deprovision(&fresh).unwrap();
        assert_eq!(
            ops,
            vec![Operation::MembersRemove {
                email: "gone@x".to_string()
            }]
        );
    }

    #[test]
    fn test_deprovision_reconfirm_failure_is_fatal() {
        let source = SourceDirectory::from_parts([Account::new("a@x")], Vec::new());
        let target = target(&["gone@x"]);

        let result = AccountReconciler::new(&source, &target).deprovision(&FailingResolver);
        assert!(result.is_err());
    }

    #[test]
    fn test_deprovision_skips_reconfirm_without_candidates() {
        let source = SourceDirectory::from_parts([Account::new("a@x")], Vec::new());
        let target = target(&["a@x"]);

        let ops = AccountReconciler::new(&source, &target).deprovision(&FailingResolver).unwrap();
        assert!(ops.is_empty());
    }
}

//! Target directory snapshot.

use crate::error::{Error, Result};
use crate::model::{Account, Group};
use crate::provider::TargetProvider;
use std::collections::{BTreeMap, HashMap};

/// Read-only view of the target directory for one run.
#[derive(Debug, Clone, Default)]
pub struct TargetDirectory {
    accounts: BTreeMap<String, Account>,
    groups: BTreeMap<String, Group>,
    by_correlation: HashMap<String, String>,
}

impl TargetDirectory {
    /// Build a snapshot, rejecting correlation ids shared by two groups.
    pub fn new(
        accounts: impl IntoIterator<Item = Account>,
        groups: impl IntoIterator<Item = Group>,
    ) -> Result<Self> {
        let accounts = accounts
            .into_iter()
            .map(|a| (a.email.clone(), a))
            .collect();

        let mut by_correlation: HashMap<String, String> = HashMap::new();
        let mut by_id = BTreeMap::new();
        for group in groups {
            if let Some(correlation_id) = group.correlation_id.as_deref().filter(|c| !c.is_empty()) {
                if let Some(first) = by_correlation.get(correlation_id) {
                    return Err(Error::DuplicateCorrelation {
                        correlation_id: correlation_id.to_string(),
                        first: first.clone(),
                        second: group.group_id.clone(),
                    });
                }
                by_correlation.insert(correlation_id.to_string(), group.group_id.clone());
            }
            by_id.insert(group.group_id.clone(), group);
        }

        Ok(Self {
            accounts,
            groups: by_id,
            by_correlation,
        })
    }

    /// Load every account and group from a provider.
    pub fn load<P: TargetProvider + ?Sized>(provider: &P) -> Result<Self> {
        let accounts = provider.list_accounts()?;
        let groups = provider.list_groups()?;
        let snapshot = Self::new(accounts, groups)?;
        log::info!(
            "Loaded target directory: {} account(s), {} group(s)",
            snapshot.accounts.len(),
            snapshot.groups.len()
        );
        Ok(snapshot)
    }

    pub fn accounts(&self) -> &BTreeMap<String, Account> {
        &self.accounts
    }

    pub fn contains_account(&self, email: &str) -> bool {
        self.accounts.contains_key(email)
    }

    pub fn groups(&self) -> &BTreeMap<String, Group> {
        &self.groups
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.get(group_id)
    }

    /// The group created from the source group with this id, if any.
    pub fn find_by_correlation(&self, correlation_id: &str) -> Option<&Group> {
        self.by_correlation
            .get(correlation_id)
            .and_then(|id| self.groups.get(id))
    }
}

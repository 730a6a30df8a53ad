//! Source directory snapshot.

use crate::cache::CachingResolver;
use crate::email::{EmailIndex, EmailKind, EmailResolver};
use crate::error::Result;
use crate::flatten::GroupFlattener;
use crate::model::{Account, Group, RawGroup};
use crate::provider::DirectoryProvider;
use std::collections::{BTreeMap, HashMap};

/// Read-only view of the source directory for one run.
///
/// Holds every account, every address, the group listing, and the flattened
/// membership of the groups requested at load time. Source groups are
/// identified by their address: `group_id` of a flattened group is its email,
/// which is also what target groups carry as correlation id.
#[derive(Debug, Clone, Default)]
pub struct SourceDirectory {
    accounts: BTreeMap<String, Account>,
    index: EmailIndex,
    groups: Vec<RawGroup>,
    flattened: HashMap<String, Group>,
}

impl SourceDirectory {
    /// Load accounts and groups, flattening each group named in `group_keys`.
    ///
    /// Keys that match no group are ignored here; reconciling them reports
    /// the missing group.
    pub fn load<P, K>(resolver: &mut CachingResolver<P>, group_keys: &[K]) -> Result<Self>
    where
        P: DirectoryProvider,
        K: AsRef<str>,
    {
        let users = resolver.users()?;
        let groups = resolver.groups()?;

        let accounts: BTreeMap<String, Account> = users
            .iter()
            .map(|u| (u.primary_email.clone(), u.to_account()))
            .collect();
        let index = EmailIndex::from_listing(&users, &groups);

        let mut flattened = HashMap::new();
        for key in group_keys {
            let key = key.as_ref();
            let Some(raw) = groups.iter().find(|g| g.matches_key(key)) else {
                log::debug!("Source group {} not found", key);
                continue;
            };
            if flattened.contains_key(&raw.email) {
                continue;
            }
            let members = GroupFlattener::new(resolver).flatten(&raw.email)?;
            let group = Group::new(&raw.email, &raw.name, &raw.email)
                .with_members(members.iter().cloned());
            flattened.insert(raw.email.clone(), group);
        }

        log::info!(
            "Loaded source directory: {} account(s), {} group(s), {} flattened",
            accounts.len(),
            groups.len(),
            flattened.len()
        );

        Ok(Self {
            accounts,
            index,
            groups: groups.to_vec(),
            flattened,
        })
    }

    /// Build a snapshot from values already in hand.
    pub fn from_parts(
        accounts: impl IntoIterator<Item = Account>,
        groups: impl IntoIterator<Item = Group>,
    ) -> Self {
        let mut snapshot = Self::default();
        for group in groups {
            snapshot.index.insert(&group.group_email, EmailKind::Group);
            snapshot
                .groups
                .push(RawGroup::new(&group.group_id, &group.group_email, &group.group_name));
            snapshot.flattened.insert(group.group_email.clone(), group);
        }
        for account in accounts {
            snapshot.index.insert(&account.email, EmailKind::User);
            snapshot.accounts.insert(account.email.clone(), account);
        }
        snapshot
    }

    /// Register an alias address.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if self.index.kind(&alias).is_none() {
            self.index.insert(alias, EmailKind::Alias);
        }
        self
    }

    pub fn accounts(&self) -> &BTreeMap<String, Account> {
        &self.accounts
    }

    /// A flattened group by id or address.
    pub fn group(&self, key: &str) -> Option<&Group> {
        let raw = self.groups.iter().find(|g| g.matches_key(key))?;
        self.flattened.get(&raw.email)
    }

    /// What `email` belongs to, if the source knows it at all.
    pub fn email_kind(&self, email: &str) -> Option<EmailKind> {
        self.index.kind(email)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl EmailResolver for SourceDirectory {
    fn email_exists(&self, email: &str) -> Result<bool> {
        self.index.email_exists(email)
    }
}

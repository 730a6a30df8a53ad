//! Nested group flattening.
//!
//! A group's raw membership mixes users, nested groups and whole
//! organisations. [`GroupFlattener`] walks it recursively and produces one
//! deduplicated [`MemberSet`]. Groups currently being expanded are tracked so
//! a membership cycle ends the walk instead of recursing forever.

use crate::cache::CachingResolver;
use crate::error::Result;
use crate::model::{Account, MemberKind, MemberSet, RawMember};
use crate::provider::DirectoryProvider;
use std::collections::HashSet;

pub struct GroupFlattener<'r, P> {
    resolver: &'r mut CachingResolver<P>,
}

impl<'r, P: DirectoryProvider> GroupFlattener<'r, P> {
    pub fn new(resolver: &'r mut CachingResolver<P>) -> Self {
        Self { resolver }
    }

    /// Every account reachable from `group_key`, first seen wins.
    pub fn flatten(&mut self, group_key: &str) -> Result<MemberSet> {
        let mut expanding = HashSet::new();
        let mut members = MemberSet::new();
        self.expand_group(group_key, &mut expanding, &mut members)?;
        log::debug!("Flattened {}: {} member(s)", group_key, members.len());
        Ok(members)
    }

    fn expand_group(
        &mut self,
        group_key: &str,
        expanding: &mut HashSet<String>,
        out: &mut MemberSet,
    ) -> Result<()> {
        if !expanding.insert(group_key.to_string()) {
            log::warn!("Group {} is nested inside itself, skipping re-entry", group_key);
            return Ok(());
        }

        let members = self.resolver.group_members(group_key)?;
        for member in members.iter() {
            self.expand_member(group_key, member, expanding, out)?;
        }

        expanding.remove(group_key);
        Ok(())
    }

    fn expand_member(
        &mut self,
        group_key: &str,
        member: &RawMember,
        expanding: &mut HashSet<String>,
        out: &mut MemberSet,
    ) -> Result<()> {
        match (&member.kind, member.email.as_deref(), member.id.as_deref()) {
            (MemberKind::User, Some(email), _) => {
                out.insert(Account::new(email));
            }
            (MemberKind::Group, Some(email), _) => {
                log::trace!("Expanding nested group {} in {}", email, group_key);
                self.expand_group(email, expanding, out)?;
            }
            (MemberKind::Customer, _, Some(customer_id)) => {
                let users = self.resolver.customer_users(customer_id)?;
                log::trace!(
                    "Expanding customer {} in {}: {} user(s)",
                    customer_id,
                    group_key,
                    users.len()
                );
                out.extend(users.iter().map(|u| u.to_account()));
            }
            (MemberKind::Other(kind), _, _) => {
                log::warn!("Unknown member type {} in group {}, skipping", kind, group_key);
            }
            (kind, _, _) => {
                log::warn!("{} member without identifier in group {}, skipping", kind, group_key);
            }
        }
        Ok(())
    }
}

//! Memoizing wrapper around a [`DirectoryProvider`].
//!
//! One resolver lives for one run. Every distinct key is fetched from the
//! provider at most once; later lookups are served from memory. Results are
//! shared as `Rc<Vec<_>>` so recursive callers can hold a listing while
//! asking the resolver for more.

use crate::error::{Error, Result};
use crate::model::{RawGroup, RawMember, RawUser};
use crate::provider::DirectoryProvider;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub struct CachingResolver<P> {
    provider: P,
    users: Option<Rc<Vec<RawUser>>>,
    groups: Option<Rc<Vec<RawGroup>>>,
    loaded_members: HashSet<String>,
    members: HashMap<String, Rc<Vec<RawMember>>>,
    loaded_customers: HashSet<String>,
    customers: HashMap<String, Rc<Vec<RawUser>>>,
}

impl<P: DirectoryProvider> CachingResolver<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            users: None,
            groups: None,
            loaded_members: HashSet::new(),
            members: HashMap::new(),
            loaded_customers: HashSet::new(),
            customers: HashMap::new(),
        }
    }

    /// The wrapped provider, for lookups that must bypass the cache.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn users(&mut self) -> Result<Rc<Vec<RawUser>>> {
        if let Some(users) = &self.users {
            return Ok(Rc::clone(users));
        }
        let users = Rc::new(self.provider.list_users()?);
        self.users = Some(Rc::clone(&users));
        Ok(users)
    }

    pub fn groups(&mut self) -> Result<Rc<Vec<RawGroup>>> {
        if let Some(groups) = &self.groups {
            return Ok(Rc::clone(groups));
        }
        let groups = Rc::new(self.provider.list_groups()?);
        self.groups = Some(Rc::clone(&groups));
        Ok(groups)
    }

    /// Find a group by id or email.
    pub fn find_group(&mut self, key: &str) -> Result<Option<RawGroup>> {
        Ok(self.groups()?.iter().find(|g| g.matches_key(key)).cloned())
    }

    pub fn group_members(&mut self, group_key: &str) -> Result<Rc<Vec<RawMember>>> {
        let provider = &self.provider;
        load_keyed(
            &mut self.loaded_members,
            &mut self.members,
            "group members",
            group_key,
            || provider.list_group_members(group_key),
        )
    }

    pub fn customer_users(&mut self, customer_id: &str) -> Result<Rc<Vec<RawUser>>> {
        let provider = &self.provider;
        load_keyed(
            &mut self.loaded_customers,
            &mut self.customers,
            "customer users",
            customer_id,
            || provider.list_customer_users(customer_id),
        )
    }
}

fn load_keyed<T>(
    loaded: &mut HashSet<String>,
    cache: &mut HashMap<String, Rc<Vec<T>>>,
    kind: &'static str,
    key: &str,
    fetch: impl FnOnce() -> Result<Vec<T>>,
) -> Result<Rc<Vec<T>>> {
    if !loaded.contains(key) {
        let items = fetch()?;
        cache.insert(key.to_string(), Rc::new(items));
        loaded.insert(key.to_string());
    }
    cache
        .get(key)
        .map(Rc::clone)
        .ok_or_else(|| Error::InconsistentCache {
            kind,
            key: key.to_string(),
        })
}

//! Provider traits and an in-memory provider for tests.
//!
//! A [`DirectoryProvider`] is the raw client for the source directory. It
//! exposes one page per call; the `list_*` methods drain every page. The
//! target side only needs whole listings, so [`TargetProvider`] is simpler.
//!
//! # Testing
//!
//! Use [`MockProvider`] to serve a directory from memory. It paginates like
//! a remote service and records every page request:
//!
//! ```
//! use directory::provider::{DirectoryProvider, MockProvider};
//! use directory::{RawGroup, RawMember, RawUser};
//!
//! let mut mock = MockProvider::new().with_page_size(1);
//! mock.add_user(RawUser::new("a@example.com", "Ann", "Lee"));
//! mock.add_user(RawUser::new("b@example.com", "Bo", "Kim"));
//! mock.add_group(RawGroup::new("g1", "eng@example.com", "Engineering"));
//! mock.add_member("eng@example.com", RawMember::user("a@example.com"));
//!
//! assert_eq!(mock.list_users().unwrap().len(), 2);
//! assert_eq!(mock.page_calls("users"), 2);
//! ```

use crate::error::{Error, Result};
use crate::model::{Account, Group, RawGroup, RawMember, RawUser};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` on the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// Fetch pages until the provider stops returning a cursor.
pub fn drain<T, F>(what: &str, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<&str>) -> Result<Page<T>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = fetch(cursor.as_deref())?;
        log::trace!("Loaded {} chunk: {} item(s)", what, page.items.len());
        items.extend(page.items);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    log::debug!("Loaded {}: {} item(s)", what, items.len());
    Ok(items)
}

/// Raw client for the source directory.
pub trait DirectoryProvider {
    fn users_page(&self, cursor: Option<&str>) -> Result<Page<RawUser>>;

    fn groups_page(&self, cursor: Option<&str>) -> Result<Page<RawGroup>>;

    /// Direct members of a group, keyed by group id or email.
    fn group_members_page(&self, group_key: &str, cursor: Option<&str>)
    -> Result<Page<RawMember>>;

    /// Every user belonging to an organisation.
    fn customer_users_page(&self, customer_id: &str, cursor: Option<&str>)
    -> Result<Page<RawUser>>;

    fn list_users(&self) -> Result<Vec<RawUser>> {
        drain("users", |cursor| self.users_page(cursor))
    }

    fn list_groups(&self) -> Result<Vec<RawGroup>> {
        drain("groups", |cursor| self.groups_page(cursor))
    }

    fn list_group_members(&self, group_key: &str) -> Result<Vec<RawMember>> {
        drain(&format!("members of {group_key}"), |cursor| {
            self.group_members_page(group_key, cursor)
        })
    }

    fn list_customer_users(&self, customer_id: &str) -> Result<Vec<RawUser>> {
        drain(&format!("users of customer {customer_id}"), |cursor| {
            self.customer_users_page(customer_id, cursor)
        })
    }
}

/// Source of the target directory's accounts and groups.
pub trait TargetProvider {
    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Groups with their members and correlation ids.
    fn list_groups(&self) -> Result<Vec<Group>>;
}

/// Serve one page out of an in-memory listing.
///
/// Cursors are decimal offsets into `items`.
pub(crate) fn paginate<T: Clone>(
    what: &str,
    items: &[T],
    cursor: Option<&str>,
    page_size: usize,
) -> Result<Page<T>> {
    let start = match cursor {
        None => 0,
        Some(c) => c
            .parse::<usize>()
            .ok()
            .filter(|offset| *offset <= items.len())
            .ok_or_else(|| Error::InvalidCursor {
                what: what.to_string(),
                cursor: c.to_string(),
            })?,
    };
    let end = (start + page_size.max(1)).min(items.len());
    let next_cursor = (end < items.len()).then(|| end.to_string());
    Ok(Page {
        items: items[start..end].to_vec(),
        next_cursor,
    })
}

/// In-memory source directory for testing.
#[derive(Debug, Default)]
pub struct MockProvider {
    users: Vec<RawUser>,
    groups: Vec<RawGroup>,
    members: HashMap<String, Vec<RawMember>>,
    page_size: usize,
    failing: HashSet<String>,
    calls: RefCell<Vec<(String, Option<String>)>>,
}

impl MockProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            page_size: 100,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn add_user(&mut self, user: RawUser) {
        self.users.push(user);
    }

    pub fn add_group(&mut self, group: RawGroup) {
        self.groups.push(group);
    }

    /// Add a direct member to a group, keyed by group email.
    pub fn add_member(&mut self, group_key: impl Into<String>, member: RawMember) {
        self.members.entry(group_key.into()).or_default().push(member);
    }

    /// Make every page request for `call` fail.
    ///
    /// Call names are `users`, `groups`, `members:<key>` and `customer:<id>`.
    pub fn fail_on(&mut self, call: impl Into<String>) {
        self.failing.insert(call.into());
    }

    /// Number of listings started for a call (first-page requests).
    pub fn fetch_count(&self, call: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(name, cursor)| name == call && cursor.is_none())
            .count()
    }

    /// Number of page requests made for a call.
    pub fn page_calls(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|(name, _)| name == call).count()
    }

    fn record(&self, call: String, cursor: Option<&str>) -> Result<()> {
        let failing = self.failing.contains(&call);
        self.calls.borrow_mut().push((call.clone(), cursor.map(str::to_string)));
        if failing {
            return Err(Error::Provider(format!("mock failure for {call}")));
        }
        Ok(())
    }
}

impl DirectoryProvider for MockProvider {
    fn users_page(&self, cursor: Option<&str>) -> Result<Page<RawUser>> {
        self.record("users".to_string(), cursor)?;
        paginate("users", &self.users, cursor, self.page_size)
    }

    fn groups_page(&self, cursor: Option<&str>) -> Result<Page<RawGroup>> {
        self.record("groups".to_string(), cursor)?;
        paginate("groups", &self.groups, cursor, self.page_size)
    }

    fn group_members_page(
        &self,
        group_key: &str,
        cursor: Option<&str>,
    ) -> Result<Page<RawMember>> {
        self.record(format!("members:{group_key}"), cursor)?;
        let members = self.members.get(group_key).map(Vec::as_slice).unwrap_or(&[]);
        paginate("group members", members, cursor, self.page_size)
    }

    fn customer_users_page(
        &self,
        customer_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<RawUser>> {
        self.record(format!("customer:{customer_id}"), cursor)?;
        let users: Vec<RawUser> = self
            .users
            .iter()
            .filter(|u| u.customer.as_deref() == Some(customer_id))
            .cloned()
            .collect();
        paginate("customer users", &users, cursor, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_splits_pages() {
        let items = vec![1, 2, 3, 4, 5];
        let first = paginate("n", &items, None, 2).unwrap();
        assert_eq!(first.items, vec![1, 2]);
        assert_eq!(first.next_cursor.as_deref(), Some("2"));

        let last = paginate("n", &items, Some("4"), 2).unwrap();
        assert_eq!(last.items, vec![5]);
        assert!(last.next_cursor.is_none());
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u8> = Vec::new();
        let page = paginate("n", &items, None, 10).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_paginate_rejects_bad_cursor() {
        let items = vec![1, 2];
        assert!(paginate("n", &items, Some("abc"), 1).is_err());
        assert!(paginate("n", &items, Some("9"), 1).is_err());
    }

    #[test]
    fn test_drain_follows_cursor() {
        let pages = [
            Page {
                items: vec!["a"],
                next_cursor: Some("c1".to_string()),
            },
            Page {
                items: vec!["b", "c"],
                next_cursor: None,
            },
        ];
        let mut seen = Vec::new();
        let items = drain("letters", |cursor| {
            seen.push(cursor.map(str::to_string));
            Ok(pages[seen.len() - 1].clone())
        })
        .unwrap();

        assert_eq!(items, vec!["a", "b", "c"]);
        assert_eq!(seen, vec![None, Some("c1".to_string())]);
    }

    #[test]
    fn test_drain_stops_on_error() {
        let result: Result<Vec<u8>> =
            drain("broken", |_| Err(Error::Provider("down".to_string())));
        assert!(result.is_err());
    }

    #[test]
    fn test_mock_provider_drains_all_pages() {
        let mut mock = MockProvider::new().with_page_size(2);
        for i in 0..5 {
            mock.add_user(RawUser::new(format!("u{i}@example.com"), "U", "Ser"));
        }

        let users = mock.list_users().unwrap();
        assert_eq!(users.len(), 5);
        assert_eq!(mock.page_calls("users"), 3);
        assert_eq!(mock.fetch_count("users"), 1);
    }

    #[test]
    fn test_mock_provider_customer_users() {
        let mut mock = MockProvider::new();
        mock.add_user(RawUser::new("a@example.com", "Ann", "Lee").with_customer("C1"));
        mock.add_user(RawUser::new("b@example.com", "Bo", "Kim").with_customer("C2"));
        mock.add_user(RawUser::new("c@example.com", "Cy", "Park"));

        let users = mock.list_customer_users("C1").unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].primary_email, "a@example.com");
    }

    #[test]
    fn test_mock_provider_unknown_group_is_empty() {
        let mock = MockProvider::new();
        assert!(mock.list_group_members("nobody@example.com").unwrap().is_empty());
    }

    #[test]
    fn test_mock_provider_fail_on() {
        let mut mock = MockProvider::new();
        mock.fail_on("members:eng@example.com");
        assert!(mock.list_group_members("eng@example.com").is_err());
        assert!(mock.list_group_members("ops@example.com").is_ok());
    }
}

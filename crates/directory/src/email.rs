//! Email address index of the source directory.

use crate::error::Result;
use crate::model::{RawGroup, RawUser};
use crate::provider::DirectoryProvider;
use std::collections::HashMap;

/// What an address belongs to on the source side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    /// Primary address of a user.
    User,
    /// Alias address of a user.
    Alias,
    /// Address of a group.
    Group,
}

/// Existence check for an address.
pub trait EmailResolver {
    fn email_exists(&self, email: &str) -> Result<bool>;
}

/// Every address known to the source directory.
#[derive(Debug, Clone, Default)]
pub struct EmailIndex {
    emails: HashMap<String, EmailKind>,
}

impl EmailIndex {
    /// Build from listings. Primary addresses override aliases.
    pub fn from_listing(users: &[RawUser], groups: &[RawGroup]) -> Self {
        let mut emails = HashMap::new();
        for group in groups {
            emails.insert(group.email.clone(), EmailKind::Group);
        }
        for user in users {
            for alias in user.aliases() {
                emails.insert(alias.to_string(), EmailKind::Alias);
            }
        }
        for user in users {
            emails.insert(user.primary_email.clone(), EmailKind::User);
        }
        Self { emails }
    }

    /// Build from a fresh listing, bypassing any cache.
    pub fn load<P: DirectoryProvider + ?Sized>(provider: &P) -> Result<Self> {
        let users = provider.list_users()?;
        let groups = provider.list_groups()?;
        let index = Self::from_listing(&users, &groups);
        log::debug!("Indexed {} source address(es)", index.len());
        Ok(index)
    }

    pub fn kind(&self, email: &str) -> Option<EmailKind> {
        self.emails.get(email).copied()
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub(crate) fn insert(&mut self, email: impl Into<String>, kind: EmailKind) {
        self.emails.insert(email.into(), kind);
    }
}

impl EmailResolver for EmailIndex {
    fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.emails.contains_key(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;

    #[test]
    fn test_index_kinds() {
        let users = vec![
            RawUser::new("a@example.com", "Ann", "Lee").with_alias("ann@example.com"),
            RawUser::new("b@example.com", "Bo", "Kim"),
        ];
        let groups = vec![RawGroup::new("g1", "eng@example.com", "Engineering")];
        let index = EmailIndex::from_listing(&users, &groups);

        assert_eq!(index.kind("a@example.com"), Some(EmailKind::User));
        assert_eq!(index.kind("ann@example.com"), Some(EmailKind::Alias));
        assert_eq!(index.kind("eng@example.com"), Some(EmailKind::Group));
        assert_eq!(index.kind("nobody@example.com"), None);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_primary_overrides_alias() {
        let users = vec![
            RawUser::new("a@example.com", "Ann", "Lee").with_alias("b@example.com"),
            RawUser::new("b@example.com", "Bo", "Kim"),
        ];
        let index = EmailIndex::from_listing(&users, &[]);
        assert_eq!(index.kind("b@example.com"), Some(EmailKind::User));
    }

    #[test]
    fn test_load_lists_users_and_groups() {
        let mut mock = MockProvider::new();
        mock.add_user(RawUser::new("a@example.com", "Ann", "Lee"));
        mock.add_group(RawGroup::new("g1", "eng@example.com", "Engineering"));

        let index = EmailIndex::load(&mock).unwrap();
        assert!(index.email_exists("a@example.com").unwrap());
        assert!(index.email_exists("eng@example.com").unwrap());
        assert!(!index.email_exists("x@example.com").unwrap());
        assert_eq!(mock.fetch_count("users"), 1);
        assert_eq!(mock.fetch_count("groups"), 1);
    }
}

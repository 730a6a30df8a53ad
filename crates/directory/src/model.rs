//! Snapshot value types and the raw records providers hand back.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A directory account, identified by its email address.
///
/// Equality and hashing use the email only. Names are advisory: they are
/// carried along so provisioning can fill in a profile, never for matching.
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub given_name: String,
    pub surname: String,
}

impl Account {
    /// An account known only by its email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            given_name: String::new(),
            surname: String::new(),
        }
    }

    /// An account with a full profile.
    pub fn with_name(
        email: impl Into<String>,
        given_name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            given_name: given_name.into(),
            surname: surname.into(),
        }
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.email)
    }
}

/// Group membership keyed by email, in the order members were first seen.
///
/// Inserting an email that is already present keeps the existing entry.
#[derive(Debug, Clone, Default)]
pub struct MemberSet {
    members: Vec<Account>,
    /// Email to position in `members`
    positions: HashMap<String, usize>,
}

impl MemberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account. Returns `false` if its email was already present.
    pub fn insert(&mut self, account: Account) -> bool {
        if self.positions.contains_key(&account.email) {
            return false;
        }
        self.positions.insert(account.email.clone(), self.members.len());
        self.members.push(account);
        true
    }

    pub fn contains(&self, email: &str) -> bool {
        self.positions.contains_key(email)
    }

    pub fn get(&self, email: &str) -> Option<&Account> {
        self.positions.get(email).map(|&i| &self.members[i])
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Account> {
        self.members.iter()
    }

    /// Member emails in insertion order.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|a| a.email.as_str())
    }
}

impl Extend<Account> for MemberSet {
    fn extend<I: IntoIterator<Item = Account>>(&mut self, iter: I) {
        for account in iter {
            self.insert(account);
        }
    }
}

impl FromIterator<Account> for MemberSet {
    fn from_iter<I: IntoIterator<Item = Account>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a MemberSet {
    type Item = &'a Account;
    type IntoIter = std::slice::Iter<'a, Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// A group on either side of the sync.
///
/// `correlation_id` is only set on target groups: it names the source group
/// the target group was created from.
#[derive(Debug, Clone)]
pub struct Group {
    pub group_id: String,
    pub group_name: String,
    pub group_email: String,
    pub members: MemberSet,
    pub correlation_id: Option<String>,
}

impl Group {
    pub fn new(
        group_id: impl Into<String>,
        group_name: impl Into<String>,
        group_email: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            group_name: group_name.into(),
            group_email: group_email.into(),
            members: MemberSet::new(),
            correlation_id: None,
        }
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = Account>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

// =============================================================================
// Raw provider records
// =============================================================================

/// A user as listed by the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUser {
    pub primary_email: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    /// Every address the user receives mail at, aliases included.
    #[serde(default)]
    pub emails: Vec<String>,
    /// Organisation (customer) the user belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

impl RawUser {
    pub fn new(
        primary_email: impl Into<String>,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
    ) -> Self {
        Self {
            primary_email: primary_email.into(),
            given_name: given_name.into(),
            family_name: family_name.into(),
            emails: Vec::new(),
            customer: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.emails.push(alias.into());
        self
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// Alias addresses, excluding the primary one.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.emails
            .iter()
            .map(String::as_str)
            .filter(move |e| *e != self.primary_email)
    }

    pub fn to_account(&self) -> Account {
        Account::with_name(&self.primary_email, &self.given_name, &self.family_name)
    }
}

/// A group as listed by the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGroup {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl RawGroup {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }

    /// A group key matches either the internal id or the group address.
    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || self.email == key
    }
}

/// Kind of a raw group member entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberKind {
    User,
    Group,
    /// Every account of an organisation.
    Customer,
    Other(String),
}

impl From<String> for MemberKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "USER" => Self::User,
            "GROUP" => Self::Group,
            "CUSTOMER" => Self::Customer,
            _ => Self::Other(value),
        }
    }
}

impl From<MemberKind> for String {
    fn from(kind: MemberKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Group => write!(f, "GROUP"),
            Self::Customer => write!(f, "CUSTOMER"),
            Self::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// One entry of a group's direct membership.
///
/// USER and GROUP entries carry an email; CUSTOMER entries carry an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMember {
    #[serde(rename = "type")]
    pub kind: MemberKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RawMember {
    pub fn user(email: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::User,
            email: Some(email.into()),
            id: None,
        }
    }

    pub fn group(email: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Group,
            email: Some(email.into()),
            id: None,
        }
    }

    pub fn customer(id: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Customer,
            email: None,
            id: Some(id.into()),
        }
    }

    pub fn other(kind: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Other(kind.into()),
            email: Some(email.into()),
            id: None,
        }
    }
}

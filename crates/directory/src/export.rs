//! JSON export files for either side of the sync.
//!
//! Exports let a run work from files produced by the directory admin tools
//! instead of live APIs. The source export is served page by page so it
//! exercises the same draining path as a remote provider.
//!
//! Source export:
//!
//! ```json
//! {
//!   "users": [{"primary_email": "a@example.com", "given_name": "Ann",
//!              "family_name": "Lee", "emails": ["ann@example.com"], "customer": "C01"}],
//!   "groups": [{"id": "03abc", "email": "eng@example.com", "name": "Engineering"}],
//!   "members": {"eng@example.com": [{"type": "USER", "email": "a@example.com"},
//!                                   {"type": "CUSTOMER", "id": "C01"}]}
//! }
//! ```
//!
//! Target export:
//!
//! ```json
//! {
//!   "members": [{"email": "a@example.com", "given_name": "Ann", "surname": "Lee"}],
//!   "groups": [{"group_id": "g:1", "group_name": "Engineering",
//!               "group_external_id": "eng@example.com", "members": ["a@example.com"]}]
//! }
//! ```

use crate::error::{Error, Result};
use crate::model::{Account, Group, RawGroup, RawMember, RawUser};
use crate::provider::{DirectoryProvider, Page, TargetProvider, paginate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Page size used when serving a source export.
pub const DEFAULT_PAGE_SIZE: usize = 200;

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::InvalidData(format!("{}: {}", path.display(), e)))
}

/// Source directory export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceExport {
    #[serde(default)]
    pub users: Vec<RawUser>,
    #[serde(default)]
    pub groups: Vec<RawGroup>,
    /// Direct members keyed by group email.
    #[serde(default)]
    pub members: HashMap<String, Vec<RawMember>>,
    #[serde(skip, default = "default_page_size")]
    page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl SourceExport {
    pub fn load(path: &Path) -> Result<Self> {
        let export: Self = read_json(path)?;
        log::debug!(
            "Read source export {}: {} user(s), {} group(s)",
            path.display(),
            export.users.len(),
            export.groups.len()
        );
        Ok(export)
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn members_of(&self, group_key: &str) -> &[RawMember] {
        if let Some(members) = self.members.get(group_key) {
            return members;
        }
        self.groups
            .iter()
            .find(|g| g.id == group_key)
            .and_then(|g| self.members.get(&g.email))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl DirectoryProvider for SourceExport {
    fn users_page(&self, cursor: Option<&str>) -> Result<Page<RawUser>> {
        paginate("users", &self.users, cursor, self.page_size)
    }

    fn groups_page(&self, cursor: Option<&str>) -> Result<Page<RawGroup>> {
        paginate("groups", &self.groups, cursor, self.page_size)
    }

    fn group_members_page(
        &self,
        group_key: &str,
        cursor: Option<&str>,
    ) -> Result<Page<RawMember>> {
        paginate("group members", self.members_of(group_key), cursor, self.page_size)
    }

    fn customer_users_page(
        &self,
        customer_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<RawUser>> {
        let users: Vec<RawUser> = self
            .users
            .iter()
            .filter(|u| u.customer.as_deref() == Some(customer_id))
            .cloned()
            .collect();
        paginate("customer users", &users, cursor, self.page_size)
    }
}

/// One account in a target export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMember {
    pub email: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub surname: String,
}

/// One group in a target export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportGroup {
    pub group_id: String,
    pub group_name: String,
    #[serde(default)]
    pub group_external_id: Option<String>,
    /// Member emails.
    #[serde(default)]
    pub members: Vec<String>,
}

/// Target directory export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetExport {
    #[serde(default)]
    pub members: Vec<ExportMember>,
    #[serde(default)]
    pub groups: Vec<ExportGroup>,
}

impl TargetExport {
    pub fn load(path: &Path) -> Result<Self> {
        let export: Self = read_json(path)?;
        log::debug!(
            "Read target export {}: {} member(s), {} group(s)",
            path.display(),
            export.members.len(),
            export.groups.len()
        );
        Ok(export)
    }
}

impl TargetProvider for TargetExport {
    fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self
            .members
            .iter()
            .map(|m| Account::with_name(&m.email, &m.given_name, &m.surname))
            .collect())
    }

    fn list_groups(&self) -> Result<Vec<Group>> {
        let profiles: HashMap<&str, &ExportMember> =
            self.members.iter().map(|m| (m.email.as_str(), m)).collect();

        Ok(self
            .groups
            .iter()
            .map(|g| {
                let members = g.members.iter().map(|email| match profiles.get(email.as_str()) {
                    Some(m) => Account::with_name(&m.email, &m.given_name, &m.surname),
                    None => Account::new(email),
                });
                Group {
                    group_id: g.group_id.clone(),
                    group_name: g.group_name.clone(),
                    group_email: String::new(),
                    members: members.collect(),
                    correlation_id: g.group_external_id.clone(),
                }
            })
            .collect())
    }
}

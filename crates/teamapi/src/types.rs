//! Wire types for the team admin API.
//!
//! Unions are encoded with a `.tag` discriminant. Only the fields dirsync
//! reads are declared; everything else in a response is ignored.

use directory::{Account, Group};
use serde::{Deserialize, Serialize};

/// Page size for `members/list` and `groups/list`.
pub const LIST_LIMIT: u32 = 100;

/// Role tag of a team administrator.
pub const TEAM_ADMIN_ROLE: &str = "team_admin";

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ListArg {
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct ContinueArg<'a> {
    pub cursor: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum UserSelector<'a> {
    Email { email: &'a str },
}

impl<'a> UserSelector<'a> {
    pub fn email(email: &'a str) -> Self {
        Self::Email { email }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum GroupSelector<'a> {
    GroupId { group_id: &'a str },
}

impl<'a> GroupSelector<'a> {
    pub fn id(group_id: &'a str) -> Self {
        Self::GroupId { group_id }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum GroupsSelector<'a> {
    GroupIds { group_ids: Vec<&'a str> },
}

#[derive(Debug, Serialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum GroupAccessType {
    Member,
}

#[derive(Debug, Serialize)]
pub struct GroupCreateArg<'a> {
    pub group_name: &'a str,
    pub group_external_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GroupUpdateArgs<'a> {
    pub group: GroupSelector<'a>,
    pub new_group_name: &'a str,
    pub return_members: bool,
}

#[derive(Debug, Serialize)]
pub struct MemberAccess<'a> {
    pub user: UserSelector<'a>,
    pub access_type: GroupAccessType,
}

#[derive(Debug, Serialize)]
pub struct GroupMembersAddArg<'a> {
    pub group: GroupSelector<'a>,
    pub members: Vec<MemberAccess<'a>>,
    pub return_members: bool,
}

#[derive(Debug, Serialize)]
pub struct GroupMembersRemoveArg<'a> {
    pub group: GroupSelector<'a>,
    pub users: Vec<UserSelector<'a>>,
    pub return_members: bool,
}

#[derive(Debug, Serialize)]
pub struct MemberAddArg<'a> {
    pub member_email: &'a str,
    pub member_given_name: &'a str,
    pub member_surname: &'a str,
    pub role: Tag,
}

#[derive(Debug, Serialize)]
pub struct MembersAddArg<'a> {
    pub new_members: Vec<MemberAddArg<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MembersGetInfoArgs<'a> {
    pub members: Vec<UserSelector<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MembersRemoveArg<'a> {
    pub user: UserSelector<'a>,
    pub wipe_data: bool,
    pub keep_account: bool,
}

// =============================================================================
// Results
// =============================================================================

/// A bare `.tag` value, for unions where only the variant name matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = ".tag")]
    pub tag: String,
}

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub surname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberProfile {
    #[serde(default)]
    pub team_member_id: String,
    pub email: String,
    #[serde(default)]
    pub name: Name,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamMemberInfo {
    pub profile: MemberProfile,
    #[serde(default)]
    pub role: Option<Tag>,
}

impl TeamMemberInfo {
    pub fn is_team_admin(&self) -> bool {
        self.role.as_ref().is_some_and(|r| r.is(TEAM_ADMIN_ROLE))
    }
}

#[derive(Debug, Deserialize)]
pub struct MembersListResult {
    pub members: Vec<TeamMemberInfo>,
    pub cursor: String,
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSummary {
    pub group_id: String,
    pub group_name: String,
    #[serde(default)]
    pub group_external_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GroupsListResult {
    pub groups: Vec<GroupSummary>,
    pub cursor: String,
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupMemberInfo {
    pub profile: MemberProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupFullInfo {
    pub group_id: String,
    pub group_name: String,
    #[serde(default)]
    pub group_external_id: Option<String>,
    #[serde(default)]
    pub members: Vec<GroupMemberInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum GroupsGetInfoItem {
    GroupInfo(GroupFullInfo),
    IdNotFound { id_not_found: String },
}

#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum MembersGetInfoItem {
    MemberInfo(TeamMemberInfo),
    IdNotFound { id_not_found: String },
}

/// Result of a call that may finish asynchronously.
#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum LaunchEmptyResult {
    Complete,
    AsyncJobId { async_job_id: String },
}

#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum MembersAddLaunch {
    Complete { complete: Vec<Tag> },
    AsyncJobId { async_job_id: String },
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&MemberProfile> for Account {
    fn from(profile: &MemberProfile) -> Self {
        Account::with_name(
            &profile.email,
            &profile.name.given_name,
            &profile.name.surname,
        )
    }
}

impl From<GroupFullInfo> for Group {
    fn from(info: GroupFullInfo) -> Self {
        let members = info.members.iter().map(|m| Account::from(&m.profile));
        let group = Group::new(info.group_id, info.group_name, "").with_members(members);
        match info.group_external_id {
            Some(id) if !id.is_empty() => group.with_correlation_id(id),
            _ => group,
        }
    }
}

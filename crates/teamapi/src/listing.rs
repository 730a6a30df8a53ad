//! Target directory listing over the team API.

use crate::client::TeamClient;
use crate::error::{Error, Result};
use crate::types::{
    ContinueArg, GroupFullInfo, GroupSummary, GroupsGetInfoItem, GroupsListResult,
    GroupsSelector, LIST_LIMIT, ListArg, MembersListResult, TeamMemberInfo,
};
use directory::provider::{Page, TargetProvider, drain};
use directory::{Account, Group};

impl TeamClient {
    /// Every team member, following `members/list/continue` cursors.
    pub fn list_members(&self) -> directory::Result<Vec<TeamMemberInfo>> {
        drain("team members", |cursor| {
            let result: MembersListResult = match cursor {
                None => self.rpc("team/members/list", &ListArg { limit: LIST_LIMIT })?,
                Some(cursor) => self.rpc("team/members/list/continue", &ContinueArg { cursor })?,
            };
            Ok(page(result.members, result.cursor, result.has_more))
        })
    }

    /// Every group summary, following `groups/list/continue` cursors.
    pub fn list_group_summaries(&self) -> directory::Result<Vec<GroupSummary>> {
        drain("team groups", |cursor| {
            let result: GroupsListResult = match cursor {
                None => self.rpc("team/groups/list", &ListArg { limit: LIST_LIMIT })?,
                Some(cursor) => self.rpc("team/groups/list/continue", &ContinueArg { cursor })?,
            };
            Ok(page(result.groups, result.cursor, result.has_more))
        })
    }

    /// Full info, including members, for one group.
    pub fn group_info(&self, group_id: &str) -> Result<GroupFullInfo> {
        let items: Vec<GroupsGetInfoItem> = self.rpc(
            "team/groups/get_info",
            &GroupsSelector::GroupIds {
                group_ids: vec![group_id],
            },
        )?;
        find_group_info(group_id, items)
    }
}

impl TargetProvider for TeamClient {
    fn list_accounts(&self) -> directory::Result<Vec<Account>> {
        let members = self.list_members()?;
        Ok(members.iter().map(|m| Account::from(&m.profile)).collect())
    }

    fn list_groups(&self) -> directory::Result<Vec<Group>> {
        let summaries = self.list_group_summaries()?;
        let total = summaries.len();
        let mut groups = Vec::with_capacity(total);
        for (i, summary) in summaries.iter().enumerate() {
            log::trace!(
                "Loading group info [{} of {}]: {} ({})",
                i + 1,
                total,
                summary.group_name,
                summary.group_id
            );
            groups.push(Group::from(self.group_info(&summary.group_id)?));
        }
        Ok(groups)
    }
}

fn page<T>(items: Vec<T>, cursor: String, has_more: bool) -> Page<T> {
    Page {
        items,
        next_cursor: has_more.then_some(cursor),
    }
}

fn find_group_info(group_id: &str, items: Vec<GroupsGetInfoItem>) -> Result<GroupFullInfo> {
    items
        .into_iter()
        .find_map(|item| match item {
            GroupsGetInfoItem::GroupInfo(info) if info.group_id == group_id => Some(info),
            _ => None,
        })
        .ok_or_else(|| Error::NotFound {
            kind: "group",
            id: group_id.to_string(),
        })
}

//! Live connector: applies operations through the team API.

use crate::client::TeamClient;
use crate::types::{
    GroupAccessType, GroupCreateArg, GroupFullInfo, GroupMembersAddArg, GroupMembersRemoveArg,
    GroupSelector, GroupUpdateArgs, LaunchEmptyResult, MemberAccess, MemberAddArg,
    MembersAddArg, MembersAddLaunch, MembersGetInfoArgs, MembersGetInfoItem, MembersRemoveArg,
    Tag, UserSelector,
};
use anyhow::{Context, Result, bail};
use reconcile::Connector;
use serde::de::IgnoredAny;

/// Connector backed by a [`TeamClient`].
///
/// Team administrators are never removed: `members_remove` looks the member
/// up first and fails the operation for an admin.
#[derive(Debug)]
pub struct TeamConnector {
    client: TeamClient,
}

impl TeamConnector {
    pub fn new(client: TeamClient) -> Self {
        Self { client }
    }
}

impl Connector for TeamConnector {
    fn groups_create(&mut self, name: &str, correlation_id: &str) -> Result<Option<String>> {
        let info: GroupFullInfo = self
            .client
            .rpc(
                "team/groups/create",
                &GroupCreateArg {
                    group_name: name,
                    group_external_id: correlation_id,
                },
            )
            .with_context(|| format!("Unable to create group {name} ({correlation_id})"))?;
        log::info!("Created group {} ({}): {}", name, correlation_id, info.group_id);
        Ok(Some(info.group_id).filter(|id| !id.is_empty()))
    }

    fn groups_update(&mut self, group_id: &str, new_name: &str) -> Result<()> {
        let _: IgnoredAny = self
            .client
            .rpc(
                "team/groups/update",
                &GroupUpdateArgs {
                    group: GroupSelector::id(group_id),
                    new_group_name: new_name,
                    return_members: false,
                },
            )
            .with_context(|| format!("Unable to rename group {group_id} to {new_name}"))?;
        log::info!("Renamed group {} to {}", group_id, new_name);
        Ok(())
    }

    fn groups_members_add(&mut self, group_id: &str, email: &str) -> Result<()> {
        let _: IgnoredAny = self
            .client
            .rpc(
                "team/groups/members/add",
                &GroupMembersAddArg {
                    group: GroupSelector::id(group_id),
                    members: vec![MemberAccess {
                        user: UserSelector::email(email),
                        access_type: GroupAccessType::Member,
                    }],
                    return_members: false,
                },
            )
            .with_context(|| format!("Unable to add {email} to group {group_id}"))?;
        log::info!("Added {} to group {}", email, group_id);
        Ok(())
    }

    fn groups_members_remove(&mut self, group_id: &str, email: &str) -> Result<()> {
        let _: IgnoredAny = self
            .client
            .rpc(
                "team/groups/members/remove",
                &GroupMembersRemoveArg {
                    group: GroupSelector::id(group_id),
                    users: vec![UserSelector::email(email)],
                    return_members: false,
                },
            )
            .with_context(|| format!("Unable to remove {email} from group {group_id}"))?;
        log::info!("Removed {} from group {}", email, group_id);
        Ok(())
    }

    fn members_add(&mut self, email: &str, given_name: &str, surname: &str) -> Result<()> {
        let launch: MembersAddLaunch = self
            .client
            .rpc(
                "team/members/add",
                &MembersAddArg {
                    new_members: vec![MemberAddArg {
                        member_email: email,
                        member_given_name: given_name,
                        member_surname: surname,
                        role: Tag::new("member_only"),
                    }],
                },
            )
            .with_context(|| format!("Unable to add account {email}"))?;
        check_members_add(email, &launch)?;
        log::info!("Added account {} ({} {})", email, given_name, surname);
        Ok(())
    }

    fn members_remove(&mut self, email: &str) -> Result<()> {
        let items: Vec<MembersGetInfoItem> = self
            .client
            .rpc(
                "team/members/get_info",
                &MembersGetInfoArgs {
                    members: vec![UserSelector::email(email)],
                },
            )
            .with_context(|| format!("Unable to load member info for {email}"))?;
        ensure_removable(email, &items)?;

        let result: LaunchEmptyResult = self
            .client
            .rpc(
                "team/members/remove",
                &MembersRemoveArg {
                    user: UserSelector::email(email),
                    wipe_data: false,
                    keep_account: false,
                },
            )
            .with_context(|| format!("Unable to remove account {email}"))?;
        match result {
            LaunchEmptyResult::Complete => log::info!("Removed account {}", email),
            LaunchEmptyResult::AsyncJobId { async_job_id } => {
                log::info!("Removing account {} (job {})", email, async_job_id);
            }
        }
        Ok(())
    }
}

/// Fail unless `items` describes exactly one member who is not a team admin.
fn ensure_removable(email: &str, items: &[MembersGetInfoItem]) -> Result<()> {
    match items {
        [MembersGetInfoItem::MemberInfo(info)] if info.is_team_admin() => {
            log::warn!("Team admin {} is never removed by dirsync", email);
            bail!("refusing to remove team admin {email}")
        }
        [MembersGetInfoItem::MemberInfo(_)] => Ok(()),
        [MembersGetInfoItem::IdNotFound { .. }] => bail!("member {email} not found"),
        _ => bail!("expected one member record for {email}, got {}", items.len()),
    }
}

fn check_members_add(email: &str, launch: &MembersAddLaunch) -> Result<()> {
    match launch {
        MembersAddLaunch::Complete { complete } => match complete.as_slice() {
            [status] if status.is("success") => Ok(()),
            [status] => bail!("account {email} not added: {}", status.tag),
            _ => bail!("expected one add result for {email}, got {}", complete.len()),
        },
        MembersAddLaunch::AsyncJobId { async_job_id } => {
            log::debug!("Adding account {} queued as job {}", email, async_job_id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member_info(value: serde_json::Value) -> Vec<MembersGetInfoItem> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_team_admin_is_not_removable() {
        let items = member_info(json!([{
            ".tag": "member_info",
            "profile": {"email": "boss@example.com"},
            "role": {".tag": "team_admin"}
        }]));
        let err = ensure_removable("boss@example.com", &items).unwrap_err();
        assert!(err.to_string().contains("team admin"));
    }

    #[test]
    fn test_regular_member_is_removable() {
        let items = member_info(json!([{
            ".tag": "member_info",
            "profile": {"email": "a@example.com"},
            "role": {".tag": "member_only"}
        }]));
        assert!(ensure_removable("a@example.com", &items).is_ok());

        let support_admin = member_info(json!([{
            ".tag": "member_info",
            "profile": {"email": "s@example.com"},
            "role": {".tag": "support_admin"}
        }]));
        assert!(ensure_removable("s@example.com", &support_admin).is_ok());
    }

    #[test]
    fn test_unknown_or_ambiguous_member() {
        let missing = member_info(json!([{".tag": "id_not_found", "id_not_found": "x@example.com"}]));
        assert!(ensure_removable("x@example.com", &missing).is_err());
        assert!(ensure_removable("x@example.com", &[]).is_err());
    }

    #[test]
    fn test_members_add_results() {
        let ok: MembersAddLaunch = serde_json::from_value(json!({
            ".tag": "complete",
            "complete": [{".tag": "success", "profile": {"email": "a@example.com"}}]
        }))
        .unwrap();
        assert!(check_members_add("a@example.com", &ok).is_ok());

        let dup: MembersAddLaunch = serde_json::from_value(json!({
            ".tag": "complete",
            "complete": [{".tag": "user_already_on_team", "user_already_on_team": "a@example.com"}]
        }))
        .unwrap();
        let err = check_members_add("a@example.com", &dup).unwrap_err();
        assert!(err.to_string().contains("user_already_on_team"));

        let queued: MembersAddLaunch =
            serde_json::from_value(json!({".tag": "async_job_id", "async_job_id": "j1"})).unwrap();
        assert!(check_members_add("a@example.com", &queued).is_ok());
    }

    #[test]
    fn test_unreachable_api_fails_operation() {
        let client = TeamClient::new("t").with_api_base("http://127.0.0.1:9");
        let mut connector = TeamConnector::new(client);
        let err = connector.members_remove("a@example.com").unwrap_err();
        assert!(format!("{err:#}").contains("Unable to load member info for a@example.com"));
    }
}

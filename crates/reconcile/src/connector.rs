//! The write side of the target directory.
//!
//! A [`Connector`] is the only way operations reach the target. The live
//! implementation talks to the target's admin API; [`DryRunConnector`]
//! records every call instead.

use anyhow::Result;

/// Capability to mutate the target directory.
pub trait Connector {
    /// Create a group. Returns the new group's id, if the target reported one.
    fn groups_create(&mut self, name: &str, correlation_id: &str) -> Result<Option<String>>;

    fn groups_update(&mut self, group_id: &str, new_name: &str) -> Result<()>;

    fn groups_members_add(&mut self, group_id: &str, email: &str) -> Result<()>;

    fn groups_members_remove(&mut self, group_id: &str, email: &str) -> Result<()>;

    fn members_add(&mut self, email: &str, given_name: &str, surname: &str) -> Result<()>;

    fn members_remove(&mut self, email: &str) -> Result<()>;
}

/// Format a connector call the way [`DryRunConnector`] records it.
pub fn operation_log(name: &str, args: &[&str]) -> String {
    format!("[{}] [{}]", name, args.join(" "))
}

/// Records calls instead of applying them.
///
/// `groups_create` answers with `mock-<correlation id>` so member additions
/// on the new group can be recorded too.
#[derive(Debug, Default)]
pub struct DryRunConnector {
    history: Vec<String>,
}

impl DryRunConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls, in order.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn record(&mut self, name: &str, args: &[&str]) {
        let line = operation_log(name, args);
        log::info!("Dry run: {}", line);
        self.history.push(line);
    }
}

impl Connector for DryRunConnector {
    fn groups_create(&mut self, name: &str, correlation_id: &str) -> Result<Option<String>> {
        self.record("GroupsCreate", &[name, correlation_id]);
        Ok(Some(format!("mock-{correlation_id}")))
    }

    fn groups_update(&mut self, group_id: &str, new_name: &str) -> Result<()> {
        self.record("GroupsUpdate", &[group_id, new_name]);
        Ok(())
    }

    fn groups_members_add(&mut self, group_id: &str, email: &str) -> Result<()> {
        self.record("GroupsMembersAdd", &[group_id, email]);
        Ok(())
    }

    fn groups_members_remove(&mut self, group_id: &str, email: &str) -> Result<()> {
        self.record("GroupsMembersRemove", &[group_id, email]);
        Ok(())
    }

    fn members_add(&mut self, email: &str, given_name: &str, surname: &str) -> Result<()> {
        self.record("MembersAdd", &[email, given_name, surname]);
        Ok(())
    }

    fn members_remove(&mut self, email: &str) -> Result<()> {
        self.record("MembersRemove", &[email]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_records_calls() {
        let mut connector = DryRunConnector::new();
        let id = connector.groups_create("Engineering", "eng@example.com").unwrap();
        connector.groups_members_add(id.as_deref().unwrap(), "a@example.com").unwrap();
        connector.members_remove("z@example.com").unwrap();

        assert_eq!(id.as_deref(), Some("mock-eng@example.com"));
        assert_eq!(
            connector.history(),
            [
                "[GroupsCreate] [Engineering eng@example.com]",
                "[GroupsMembersAdd] [mock-eng@example.com a@example.com]",
                "[MembersRemove] [z@example.com]",
            ]
        );
    }

    #[test]
    fn test_operation_log_format() {
        assert_eq!(
            operation_log("MembersAdd", &["a@example.com", "Ann", "Lee"]),
            "[MembersAdd] [a@example.com Ann Lee]"
        );
    }
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirsync")]
#[command(version)]
#[command(about = "Mirror directory accounts and groups into a team", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: dirsync.toml in the config directory)
    #[arg(short, long, global = true, env = "DIRSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile the target with the source (dry run unless --apply)
    Sync(SyncArgs),

    /// Show the operations a sync would perform
    Plan(PlanArgs),

    /// Inspect the configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// What to reconcile, shared by `sync` and `plan`
#[derive(Args, Clone, Default)]
pub struct RunArgs {
    /// Sync modes (comma-separated); overrides [sync] modes
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub mode: Vec<SyncMode>,

    /// File listing the source groups to mirror, one per line
    #[arg(short, long)]
    pub group_list: Option<PathBuf>,

    /// Only operations matching kind[:entity] (e.g. groups, members:alice@)
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Record operations without applying them
    #[arg(long, conflicts_with = "apply")]
    pub dry_run: bool,

    /// Apply operations to the target
    #[arg(long)]
    pub apply: bool,

    /// Do not ask for confirmation before applying
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Print operations as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,

    /// Check the configuration for problems
    Validate,
}

/// Sync modes, declared in the order they run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Add target accounts for source accounts
    UserProvision,
    /// Remove target accounts unknown to the source
    UserDeprovision,
    /// Create and converge target groups
    GroupProvision,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UserProvision => "user-provision",
            Self::UserDeprovision => "user-deprovision",
            Self::GroupProvision => "group-provision",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_modes_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "dirsync",
            "sync",
            "--mode",
            "group-provision,user-provision",
            "--apply",
        ])
        .unwrap();

        let Command::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.run.mode, vec![SyncMode::GroupProvision, SyncMode::UserProvision]);
        assert!(args.apply);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_dry_run_conflicts_with_apply() {
        let result = Cli::try_parse_from(["dirsync", "sync", "--dry-run", "--apply"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_json_with_global_flags() {
        let cli = Cli::try_parse_from(["dirsync", "plan", "--json", "-vv", "--config", "x.toml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Command::Plan(PlanArgs { json: true, .. })));
    }

    #[test]
    fn test_mode_order() {
        let mut modes = vec![
            SyncMode::GroupProvision,
            SyncMode::UserDeprovision,
            SyncMode::UserProvision,
        ];
        modes.sort();
        assert_eq!(
            modes,
            vec![
                SyncMode::UserProvision,
                SyncMode::UserDeprovision,
                SyncMode::GroupProvision
            ]
        );
        assert_eq!(SyncMode::UserDeprovision.to_string(), "user-deprovision");
    }
}

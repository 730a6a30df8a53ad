//! `dirsync sync` and `dirsync plan`
//!
//! Both commands load the two snapshots up front, then plan every selected
//! mode in the fixed order user-provision, user-deprovision, group-provision.
//! Accounts provisioned by this run join their groups on the next run.

use anyhow::{Context as AnyhowContext, Result, bail};
use serde::Serialize;
use std::path::PathBuf;

use directory::{
    CachingResolver, EmailIndex, EmailResolver, SourceDirectory, SourceExport, TargetDirectory,
    TargetExport,
};
use reconcile::{
    AccountReconciler, Connector, DryRunConnector, ExecuteOptions, GroupReconciler, Operation,
    Plan, PlanSummary, group_by_name,
};
use teamapi::{TeamClient, TeamConnector};

use crate::Context;
use crate::cli::{PlanArgs, RunArgs, SyncArgs, SyncMode};
use crate::config::{SyncConfig, TargetSource};
use crate::group_list;
use crate::progress::{BarProgress, PromptConfirm};
use crate::ui;

/// Inputs of one run after merging CLI flags over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Deduplicated, in execution order
    pub modes: Vec<SyncMode>,
    pub group_list: Option<PathBuf>,
    pub filter: Option<String>,
}

impl RunSettings {
    pub fn resolve(config: &SyncConfig, args: &RunArgs) -> Result<Self> {
        let mut modes = if args.mode.is_empty() {
            config.sync.modes.clone()
        } else {
            args.mode.clone()
        };
        modes.sort();
        modes.dedup();
        if modes.is_empty() {
            bail!("No sync mode selected; pass --mode or set [sync] modes");
        }

        let group_list = args.group_list.clone().or_else(|| config.group_list());
        if modes.contains(&SyncMode::GroupProvision) && group_list.is_none() {
            bail!("group-provision needs a group list (--group-list or [sync] group_list)");
        }

        Ok(Self {
            modes,
            group_list,
            filter: args.target.clone(),
        })
    }

    fn wants(&self, mode: SyncMode) -> bool {
        self.modes.contains(&mode)
    }
}

/// The target side: where the snapshot comes from and who applies changes
pub enum Target {
    Export(TargetExport),
    Api(TeamClient),
}

impl Target {
    pub fn open(config: &SyncConfig) -> Result<Self> {
        match config.target_source() {
            TargetSource::Export(path) => {
                let export = TargetExport::load(&path).map_err(|e| load_error(e, "target export"))?;
                Ok(Self::Export(export))
            }
            TargetSource::Api {
                api_base,
                token_file,
            } => {
                let token = teamapi::resolve_token(token_file.as_deref())?;
                let mut client = TeamClient::new(token);
                if let Some(base) = api_base {
                    client = client.with_api_base(base);
                }
                if let Some(proxy) = &config.sync.proxy {
                    client = client.with_proxy(proxy)?;
                }
                Ok(Self::Api(client))
            }
        }
    }

    fn snapshot(&self) -> Result<TargetDirectory> {
        let loaded = match self {
            Self::Export(export) => TargetDirectory::load(export),
            Self::Api(client) => TargetDirectory::load(client),
        };
        loaded.map_err(|e| load_error(e, "target directory"))
    }

    fn into_connector(self, dry_run: bool) -> Result<Box<dyn Connector>> {
        match (self, dry_run) {
            (_, true) => Ok(Box::new(DryRunConnector::new())),
            (Self::Api(client), false) => Ok(Box::new(TeamConnector::new(client))),
            (Self::Export(_), false) => {
                bail!("Live runs need the team API; [target] export is read-only")
            }
        }
    }
}

/// Attach the error category's advice to a load failure
fn load_error(err: directory::Error, what: &str) -> anyhow::Error {
    let category = err.category();
    anyhow::Error::new(err).context(format!(
        "Could not load {what}: {category}. {}",
        category.advice()
    ))
}

/// Load both snapshots and plan every selected mode
pub fn build_plan(config: &SyncConfig, settings: &RunSettings, target: &Target) -> Result<Plan> {
    let export_path = config.source_export()?;
    let export = SourceExport::load(&export_path)
        .map_err(|e| load_error(e, "source export"))?
        .with_page_size(config.source.page_size);

    let group_keys = match &settings.group_list {
        Some(path) if settings.wants(SyncMode::GroupProvision) => group_list::read(path)?,
        _ => Vec::new(),
    };

    let mut resolver = CachingResolver::new(export);
    let source = SourceDirectory::load(&mut resolver, &group_keys)
        .map_err(|e| load_error(e, "source directory"))?;
    let target = target.snapshot()?;

    let fresh;
    let reconfirm: &dyn EmailResolver = if settings.wants(SyncMode::UserDeprovision) {
        fresh = EmailIndex::load(resolver.provider())
            .map_err(|e| load_error(e, "source emails for reconfirmation"))?;
        &fresh
    } else {
        &source
    };

    plan_modes(&settings.modes, &source, &target, reconfirm, &group_keys)
}

/// Plan the given modes against loaded snapshots
pub fn plan_modes(
    modes: &[SyncMode],
    source: &SourceDirectory,
    target: &TargetDirectory,
    reconfirm: &dyn EmailResolver,
    group_keys: &[String],
) -> Result<Plan> {
    let mut plan = Plan::new();
    for mode in modes {
        log::info!("Planning {}", mode);
        match mode {
            SyncMode::UserProvision => {
                plan.extend(AccountReconciler::new(source, target).provision());
            }
            SyncMode::UserDeprovision => {
                let ops = AccountReconciler::new(source, target)
                    .deprovision(reconfirm)
                    .context("Deprovisioning stopped: reconfirmation lookup failed")?;
                plan.extend(ops);
            }
            SyncMode::GroupProvision => {
                plan.merge(GroupReconciler::new(source, target).reconcile_all(group_keys));
            }
        }
    }
    Ok(plan)
}

pub fn run(ctx: &Context, args: SyncArgs) -> Result<()> {
    let config = SyncConfig::load(ctx.config.as_deref())?;
    let settings = RunSettings::resolve(&config, &args.run)?;
    let dry_run = if args.apply {
        false
    } else {
        args.dry_run || config.sync.dry_run
    };

    let target = Target::open(&config)?;
    if !dry_run && matches!(target, Target::Export(_)) {
        bail!("Live runs need the team API; [target] export is read-only");
    }

    if !ctx.quiet {
        ui::header("dirsync");
        ui::kv("Modes", &mode_list(&settings.modes));
        ui::kv("Run", if dry_run { "dry run" } else { "live" });
    }

    let plan = build_plan(&config, &settings, &target)?.filter_by_target(settings.filter.as_deref());
    if !ctx.quiet {
        ui::section("Plan");
        ui::plan_summary(&PlanSummary::from_operations(&plan.operations));
    }

    let mut connector = target.into_connector(dry_run)?;
    let summary = reconcile::execute(
        plan,
        connector.as_mut(),
        &ExecuteOptions { dry_run },
        &mut BarProgress::new(ctx.quiet),
        &mut PromptConfirm {
            assume_yes: args.yes,
        },
    )?;

    summary.report.log_summary();
    if !ctx.quiet {
        ui::section("Report");
        ui::report(&summary.report);
        ui::execute_summary(&summary, dry_run);
    }

    let failures = summary.report.failures().len();
    if failures > 0 {
        bail!("Sync finished with {} failure(s)", failures);
    }
    Ok(())
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    operations: &'a [Operation],
    failures: &'a [String],
}

pub fn plan(ctx: &Context, args: PlanArgs) -> Result<()> {
    let config = SyncConfig::load(ctx.config.as_deref())?;
    let settings = RunSettings::resolve(&config, &args.run)?;
    let target = Target::open(&config)?;
    let plan = build_plan(&config, &settings, &target)?.filter_by_target(settings.filter.as_deref());

    if args.json {
        let output = PlanOutput {
            operations: &plan.operations,
            failures: plan.report.failures(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    ui::header(&format!("Plan: {}", mode_list(&settings.modes)));
    if plan.is_empty() {
        ui::success("Target is in sync");
    }
    for (name, ops) in group_by_name(&plan.operations) {
        ui::section(&format!("{} ({})", name, ops.len()));
        for op in ops {
            ui::dim(&op.args().join(" "));
        }
    }
    for failure in plan.report.failures() {
        ui::warn(failure);
    }

    println!();
    ui::plan_summary(&PlanSummary::from_operations(&plan.operations));
    Ok(())
}

fn mode_list(modes: &[SyncMode]) -> String {
    modes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

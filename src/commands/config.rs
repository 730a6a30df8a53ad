use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::{SyncConfig, TargetSource};
use crate::paths;
use crate::ui;

pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    let path = match &ctx.config {
        Some(path) => path.clone(),
        None => paths::config_file()?,
    };
    let config = SyncConfig::load_from(&path)?;
    match cmd {
        ConfigCommand::Show => {
            show(&path, &config);
            Ok(())
        }
        ConfigCommand::Validate => validate(&path, &config),
    }
}

fn show(path: &Path, config: &SyncConfig) {
    ui::header("Configuration");
    ui::kv("File", &path.display().to_string());

    ui::section("Source");
    ui::kv(
        "Export",
        &config
            .source_export()
            .map_or_else(|_| "(not set)".to_string(), |p| p.display().to_string()),
    );
    ui::kv("Page size", &config.source.page_size.to_string());

    ui::section("Target");
    match config.target_source() {
        TargetSource::Export(export) => {
            ui::kv("Export", &export.display().to_string());
            ui::info("Offline target: only dry runs are possible");
        }
        TargetSource::Api {
            api_base,
            token_file,
        } => {
            ui::kv(
                "API",
                api_base.as_deref().unwrap_or(teamapi::DEFAULT_API_BASE),
            );
            ui::kv("Token", &token_source(token_file.as_deref()));
            if let Some(proxy) = &config.sync.proxy {
                ui::kv("Proxy", proxy);
            }
        }
    }

    ui::section("Sync");
    let modes = config
        .sync
        .modes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    ui::kv(
        "Modes",
        &if modes.is_empty() {
            "(none, pass --mode)".to_string()
        } else {
            modes.join(", ")
        },
    );
    ui::kv(
        "Group list",
        &config
            .group_list()
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string()),
    );
    ui::kv("Dry run", &config.sync.dry_run.to_string());
}

fn token_source(token_file: Option<&Path>) -> String {
    if std::env::var_os(teamapi::TOKEN_ENV).is_some() {
        return format!("${}", teamapi::TOKEN_ENV);
    }
    token_file.map_or_else(
        || format!("(unset: set ${} or [target] token_file)", teamapi::TOKEN_ENV),
        |p| p.display().to_string(),
    )
}

fn validate(path: &Path, config: &SyncConfig) -> Result<()> {
    let mut issues = config.issues();
    issues.extend(missing_files(config));

    if issues.is_empty() {
        ui::success(&format!("{} is valid", path.display()));
        return Ok(());
    }
    for issue in &issues {
        ui::error(issue);
    }
    bail!("{} issue(s) in {}", issues.len(), path.display())
}

/// Configured input files that do not exist
fn missing_files(config: &SyncConfig) -> Vec<String> {
    let mut files: Vec<(&str, PathBuf)> = Vec::new();
    if let Ok(export) = config.source_export() {
        files.push(("[source] export", export));
    }
    match config.target_source() {
        TargetSource::Export(export) => files.push(("[target] export", export)),
        TargetSource::Api {
            token_file: Some(token_file),
            ..
        } => files.push(("[target] token_file", token_file)),
        TargetSource::Api { .. } => {}
    }
    if let Some(list) = config.group_list() {
        files.push(("[sync] group_list", list));
    }

    files
        .into_iter()
        .filter(|(_, path)| !path.exists())
        .map(|(key, path)| format!("{key}: {} does not exist", path.display()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("source.json"), "{}").unwrap();
        let config = SyncConfig::parse(
            "[source]\nexport = \"source.json\"\n[target]\nexport = \"target.json\"\n[sync]\ngroup_list = \"groups.txt\"\n",
            dir.path().to_path_buf(),
        )
        .unwrap();

        let missing = missing_files(&config);
        assert_eq!(missing.len(), 2);
        assert!(missing[0].starts_with("[target] export"));
        assert!(missing[1].starts_with("[sync] group_list"));
    }

    #[test]
    fn test_validate_fails_on_issues() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dirsync.toml");
        fs::write(&path, "[source]\npage_size = 0\n").unwrap();
        let config = SyncConfig::load_from(&path).unwrap();

        let err = validate(&path, &config).unwrap_err();
        assert!(err.to_string().starts_with("2 issue(s)"));
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dirsync.toml");
        fs::write(dir.path().join("source.json"), "{}").unwrap();
        fs::write(dir.path().join("target.json"), "{}").unwrap();
        fs::write(&path, "[source]\nexport = \"source.json\"\n[target]\nexport = \"target.json\"\n").unwrap();
        let config = SyncConfig::load_from(&path).unwrap();

        assert!(validate(&path, &config).is_ok());
    }
}

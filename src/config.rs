//! `dirsync.toml` - where the directories come from and how a run behaves
//!
//! ```toml
//! [source]
//! export = "exports/source.json"
//! page_size = 200
//!
//! [target]
//! token_file = "~/.config/dirsync/team-token.json"
//! # export = "exports/target.json"   # offline target, dry runs only
//!
//! [sync]
//! modes = ["user-provision", "group-provision"]
//! group_list = "groups.txt"
//! dry_run = true
//! proxy = "http://proxy.internal:3128"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::SyncMode;
use crate::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub sync: SyncOptions,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source directory export (JSON)
    pub export: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            export: None,
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    directory::export::DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Offline target snapshot; when unset the team API is used
    pub export: Option<String>,
    pub api_base: Option<String>,
    pub token_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptions {
    #[serde(default)]
    pub modes: Vec<SyncMode>,
    pub group_list: Option<String>,
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    pub proxy: Option<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            modes: Vec::new(),
            group_list: None,
            dry_run: default_dry_run(),
            proxy: None,
        }
    }
}

fn default_dry_run() -> bool {
    true
}

/// Where the target snapshot is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    Export(PathBuf),
    Api {
        api_base: Option<String>,
        token_file: Option<PathBuf>,
    },
}

impl SyncConfig {
    /// Load from an explicit path, or `dirsync.toml` in the config directory
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => paths::config_file()?,
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::parse(&content, base_dir)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str, base_dir: PathBuf) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.base_dir = base_dir;
        log::debug!("Loaded config (base dir {})", config.base_dir.display());
        Ok(config)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        paths::resolve(&self.base_dir, path)
    }

    pub fn source_export(&self) -> Result<PathBuf> {
        self.source
            .export
            .as_deref()
            .map(|p| self.resolve(p))
            .context("No source export configured ([source] export)")
    }

    pub fn target_source(&self) -> TargetSource {
        match &self.target.export {
            Some(export) => TargetSource::Export(self.resolve(export)),
            None => TargetSource::Api {
                api_base: self.target.api_base.clone(),
                token_file: self.target.token_file.as_deref().map(|p| self.resolve(p)),
            },
        }
    }

    pub fn group_list(&self) -> Option<PathBuf> {
        self.sync.group_list.as_deref().map(|p| self.resolve(p))
    }

    /// Problems that make the file unusable for any run
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.source.export.is_none() {
            issues.push("[source] export is required".to_string());
        }
        if self.source.page_size == 0 {
            issues.push("[source] page_size must be greater than zero".to_string());
        }
        if self.target.export.is_some() && self.target.api_base.is_some() {
            issues.push("[target] sets both export and api_base; choose one".to_string());
        }
        if self.sync.modes.contains(&SyncMode::GroupProvision) && self.sync.group_list.is_none() {
            issues.push("[sync] group-provision needs group_list".to_string());
        }
        if !self.sync.dry_run && self.target.export.is_some() {
            issues.push("[sync] dry_run = false needs the team API, not a target export".to_string());
        }
        if self.sync.proxy.is_some() && self.target.export.is_some() {
            issues.push("[sync] proxy is only used with the team API".to_string());
        }

        issues
    }
}

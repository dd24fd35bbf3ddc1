//! Configuration discovery and effective settings resolution.
//!
//! yamltriage reads `yamltriage.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `root`: the repository root itself
//! - `exclude`: `target`
//! - `extensions`: `yaml`, `yml`
//! - `required_key`: `id`
//! - `output`: `human`
//! - `report_dir`: unset (no artifact files)
//! - `fix.write|check`: false
//!
//! Overrides precedence: CLI > config file > defaults. Paths from the
//! config file are relative to the directory holding it; CLI paths are
//! taken as given.

use crate::store::{DEFAULT_EXCLUDE, DEFAULT_EXTENSIONS};
use crate::validate::DEFAULT_REQUIRED_KEY;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_NAMES: &[&str] = &["yamltriage.toml", "yamltriage.yaml", "yamltriage.yml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Fix-related configuration section under `[fix]`.
pub struct FixCfg {
    pub write: Option<bool>,
    pub check: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `yamltriage.toml|yaml`.
pub struct TriageConfig {
    pub root: Option<String>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    pub required_key: Option<String>,
    pub output: Option<String>,
    pub report_dir: Option<String>,
    pub fix: Option<FixCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    /// Directory scanned for documents.
    pub root: PathBuf,
    pub exclude: Vec<String>,
    pub extensions: Vec<String>,
    pub required_key: String,
    pub output: String,
    pub report_dir: Option<PathBuf>,
    pub write: bool,
    pub check: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a config file or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `TriageConfig` from `yamltriage.toml` or `yamltriage.yaml|yml`.
///
/// Returns `Ok(None)` when no config file exists.
pub fn load_config(root: &Path) -> Result<Option<TriageConfig>, ConfigError> {
    let toml_path = root.join("yamltriage.toml");
    if toml_path.exists() {
        let s = read_config(&toml_path)?;
        let cfg: TriageConfig = toml::from_str(&s).map_err(|e| ConfigError::Parse {
            path: toml_path.clone(),
            message: e.to_string(),
        })?;
        return Ok(Some(cfg));
    }
    for yml in ["yamltriage.yaml", "yamltriage.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = read_config(&p)?;
            let cfg: TriageConfig = serde_yaml::from_str(&s).map_err(|e| ConfigError::Parse {
                path: p.clone(),
                message: e.to_string(),
            })?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_root: Option<&str>,
    cli_exclude: &[String],
    cli_output: Option<&str>,
    cli_report_dir: Option<&str>,
    cli_write: Option<bool>,
    cli_check: Option<bool>,
) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root)?.unwrap_or_default();

    let root = match cli_root {
        Some(r) => PathBuf::from(r),
        None => match cfg.root.as_deref() {
            Some(r) => repo_root.join(r),
            None => repo_root.clone(),
        },
    };

    let exclude = if !cli_exclude.is_empty() {
        cli_exclude.to_vec()
    } else {
        cfg.exclude
            .unwrap_or_else(|| DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect())
    };

    let extensions = cfg
        .extensions
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect());

    let required_key = cfg
        .required_key
        .unwrap_or_else(|| DEFAULT_REQUIRED_KEY.to_string());

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let report_dir = match cli_report_dir {
        Some(d) => Some(PathBuf::from(d)),
        None => cfg.report_dir.as_deref().map(|d| repo_root.join(d)),
    };

    let write = cli_write
        .or_else(|| cfg.fix.as_ref().and_then(|f| f.write))
        .unwrap_or(false);
    let check = cli_check
        .or_else(|| cfg.fix.as_ref().and_then(|f| f.check))
        .unwrap_or(false);

    Ok(Effective {
        repo_root,
        root,
        exclude,
        extensions,
        required_key,
        output,
        report_dir,
        write,
        check,
    })
}

//! Configuration loading with env-var overrides.
//!
//! Reads a TOML file (`config/default.toml` by default), then applies
//! `WORKER_PERSISTENCE_FILE` and `WORKER_LOG_LEVEL` env overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;
use crate::mount::TtlAction;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Server-side defaults applied to every mount request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    pub read_only: bool,
    pub shared: bool,
    /// Metadata sync interval; `-1` disables syncing.
    pub sync_interval_ms: i64,
    /// Time-to-live of mounted paths; `-1` means no expiry.
    pub ttl_ms: i64,
    pub ttl_action: TtlAction,
}

/// Fully-resolved worker configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the worker persistence file (already expanded, no `~`).
    pub persistence_file: PathBuf,
    pub log_level: String,
    pub mount: MountConfig,
}

/// Raw TOML shape, the `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    worker: RawWorker,
    #[serde(default)]
    mount: RawMount,
}

#[derive(Deserialize)]
struct RawWorker {
    #[serde(default = "default_persistence_file")]
    persistence_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawWorker {
    fn default() -> Self {
        Self {
            persistence_file: default_persistence_file(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize)]
struct RawMount {
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    shared: bool,
    #[serde(default = "default_disabled_ms")]
    sync_interval_ms: i64,
    #[serde(default = "default_disabled_ms")]
    ttl_ms: i64,
    #[serde(default)]
    ttl_action: TtlAction,
}

impl Default for RawMount {
    fn default() -> Self {
        Self {
            read_only: false,
            shared: false,
            sync_interval_ms: default_disabled_ms(),
            ttl_ms: default_disabled_ms(),
            ttl_action: TtlAction::default(),
        }
    }
}

fn default_persistence_file() -> String { "~/.worker-db/cluster_id".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_disabled_ms() -> i64 { -1 }

/// Load config from `path`, then apply env-var overrides.
pub fn load(path: &Path) -> Result<Config, AppError> {
    let persistence_file_override = env::var("WORKER_PERSISTENCE_FILE").ok();
    let log_level_override = env::var("WORKER_LOG_LEVEL").ok();
    load_from(
        path,
        persistence_file_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader. Accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    persistence_file_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let w = parsed.worker;
    let persistence_file = persistence_file_override.unwrap_or(&w.persistence_file);
    if persistence_file.trim().is_empty() {
        return Err(AppError::Config(
            "[worker].persistence_file must not be empty".into(),
        ));
    }
    let m = parsed.mount;

    Ok(Config {
        persistence_file: expand_home(persistence_file),
        log_level: log_level_override.unwrap_or(&w.log_level).to_string(),
        mount: MountConfig {
            read_only: m.read_only,
            shared: m.shared,
            sync_interval_ms: m.sync_interval_ms,
            ttl_ms: m.ttl_ms,
            ttl_action: m.ttl_action,
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

#[cfg(test)]
impl Config {
    pub fn test_default(work_dir: &Path) -> Self {
        Self {
            persistence_file: work_dir.join("cluster_id"),
            log_level: "info".into(),
            mount: MountConfig {
                read_only: false,
                shared: false,
                sync_interval_ms: -1,
                ttl_ms: -1,
                ttl_action: TtlAction::Delete,
            },
        }
    }
}

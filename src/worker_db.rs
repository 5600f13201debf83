//! Worker-local persistence of small string facts, most importantly the
//! cluster id the worker last registered with.
//!
//! The backing file uses the [`properties`](crate::properties) format:
//!
//! ```text
//! # generated by worker process, don't edit it
//! # Mon, 19 Oct 2026 10:12:03 +0000
//! clusterId=6f1c2a8e-...
//! ```
//!
//! Reads degrade to `""` on any failure so a missing or damaged file never
//! blocks worker startup. Only the first-write creation of the file (and its
//! parent directories) reports an error to the caller.
//!
//! One instance per file, one thread per instance. Nothing here locks the
//! file against other processes.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::ids::INVALID_CLUSTER_ID;
use crate::properties;

/// Key under which the cluster id is stored.
pub const CLUSTER_ID_KEY: &str = "clusterId";

const FILE_COMMENT: &str = "generated by worker process, don't edit it";

/// Cluster identity persistence as seen by the worker.
pub trait BlockWorkerDb {
    /// The persisted cluster id, or [`INVALID_CLUSTER_ID`] if none is stored.
    fn get_cluster_id(&mut self) -> String;

    fn set_cluster_id(&mut self, cluster_id: &str) -> Result<(), AppError>;

    /// Forget everything persisted so far. A no-op if nothing was ever written.
    fn reset_state(&mut self) -> Result<(), AppError>;
}

/// [`BlockWorkerDb`] backed by a single property file.
#[derive(Debug)]
pub struct DefaultBlockWorkerDb {
    path: PathBuf,
    properties: BTreeMap<String, String>,
    initialized: bool,
}

impl DefaultBlockWorkerDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            properties: BTreeMap::new(),
            initialized: false,
        }
    }

    /// Store at the configured `[worker].persistence_file`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.persistence_file.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value for `key`, re-read from disk. `""` if the file or key is missing,
    /// or if the file cannot be read or parsed.
    pub fn get(&mut self, key: &str) -> String {
        debug_assert!(!key.is_empty(), "get called with an empty key");

        if !self.path.exists() {
            return String::new();
        }
        match self.reload() {
            Ok(()) => self.properties.get(key).cloned().unwrap_or_default(),
            Err(e) => {
                error!(path = %self.path.display(), key, error = %e, "cannot load worker persistence file");
                String::new()
            }
        }
    }

    /// Persist `key = value`, rewriting the whole file from the in-memory map.
    ///
    /// Fails only if the file or its parent directories cannot be created.
    /// A failed write is logged and otherwise ignored; the in-memory map keeps
    /// the new value either way.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        debug_assert!(!key.is_empty(), "set called with an empty key");
        self.init()?;

        self.properties.insert(key.to_string(), value.to_string());
        let body = properties::render(&self.properties, Some(FILE_COMMENT));
        match fs::write(&self.path, body) {
            Ok(()) => debug!(path = %self.path.display(), key, "worker persistence file written"),
            Err(e) => {
                error!(path = %self.path.display(), key, error = %e, "cannot write worker persistence file")
            }
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<(), AppError> {
        let text = fs::read_to_string(&self.path)?;
        self.properties = properties::parse(&text).map_err(|source| AppError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Create the file and its parents once per process, before the first write.
    fn init(&mut self) -> Result<(), AppError> {
        if self.initialized {
            return Ok(());
        }

        if !self.path.exists() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Persistence(format!(
                        "cannot create directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| {
                    AppError::Persistence(format!("cannot create {}: {e}", self.path.display()))
                })?;
            info!(path = %self.path.display(), "created worker persistence file");
        }

        self.initialized = true;
        Ok(())
    }
}

impl BlockWorkerDb for DefaultBlockWorkerDb {
    fn get_cluster_id(&mut self) -> String {
        let cluster_id = self.get(CLUSTER_ID_KEY);
        if cluster_id.is_empty() {
            INVALID_CLUSTER_ID.to_string()
        } else {
            cluster_id
        }
    }

    fn set_cluster_id(&mut self, cluster_id: &str) -> Result<(), AppError> {
        self.set(CLUSTER_ID_KEY, cluster_id)
    }

    fn reset_state(&mut self) -> Result<(), AppError> {
        if !self.path.exists() {
            return Ok(());
        }

        self.properties.clear();
        fs::write(&self.path, "").map_err(|e| {
            AppError::Persistence(format!("cannot clear {}: {e}", self.path.display()))
        })?;
        info!(path = %self.path.display(), "worker persistence file cleared");
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! Mount option records and their merge rules.
//!
//! Every scalar is optional: `None` means "not set by this layer". Merging
//! `other` into `self` lets each field set in `other` win, inserts `other`'s
//! property entries over `self`'s, and merges the nested common options the
//! same way.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::config::MountConfig;

/// What happens to a mounted path once its TTL expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlAction {
    #[default]
    Delete,
    Free,
}

impl fmt::Display for TtlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => f.write_str("delete"),
            Self::Free => f.write_str("free"),
        }
    }
}

/// Options shared by all file-system master operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonOptions {
    pub sync_interval_ms: Option<i64>,
    pub ttl_ms: Option<i64>,
    pub ttl_action: Option<TtlAction>,
    pub operation_id: Option<String>,
}

impl CommonOptions {
    pub fn merge_from(&mut self, other: &CommonOptions) {
        if other.sync_interval_ms.is_some() {
            self.sync_interval_ms = other.sync_interval_ms;
        }
        if other.ttl_ms.is_some() {
            self.ttl_ms = other.ttl_ms;
        }
        if other.ttl_action.is_some() {
            self.ttl_action = other.ttl_action;
        }
        if other.operation_id.is_some() {
            self.operation_id.clone_from(&other.operation_id);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptions {
    pub read_only: Option<bool>,
    pub shared: Option<bool>,
    /// Under-storage specific settings passed through to the mounted system.
    pub properties: BTreeMap<String, String>,
    pub common: Option<CommonOptions>,
}

impl MountOptions {
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = Some(shared);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_common(mut self, common: CommonOptions) -> Self {
        self.common = Some(common);
        self
    }

    pub fn merge_from(&mut self, other: &MountOptions) {
        if other.read_only.is_some() {
            self.read_only = other.read_only;
        }
        if other.shared.is_some() {
            self.shared = other.shared;
        }
        self.properties
            .extend(other.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(theirs) = &other.common {
            self.common
                .get_or_insert_with(CommonOptions::default)
                .merge_from(theirs);
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn is_shared(&self) -> bool {
        self.shared.unwrap_or(false)
    }
}

/// Server defaults for a mount request; every scalar field is set.
pub fn mount_defaults(config: &MountConfig) -> MountOptions {
    MountOptions {
        read_only: Some(config.read_only),
        shared: Some(config.shared),
        properties: BTreeMap::new(),
        common: Some(CommonOptions {
            sync_interval_ms: Some(config.sync_interval_ms),
            ttl_ms: Some(config.ttl_ms),
            ttl_action: Some(config.ttl_action),
            operation_id: None,
        }),
    }
}

struct Field<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Field<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => fmt::Display::fmt(v, f),
            None => f.write_str("unset"),
        }
    }
}

impl fmt::Display for CommonOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{sync_interval_ms={}, ttl_ms={}, ttl_action={}, operation_id={}}}",
            Field(&self.sync_interval_ms),
            Field(&self.ttl_ms),
            Field(&self.ttl_action),
            Field(&self.operation_id),
        )
    }
}

impl fmt::Display for MountOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{read_only={}, shared={}, properties={{",
            Field(&self.read_only),
            Field(&self.shared)
        )?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}, common=")?;
        match &self.common {
            Some(common) => write!(f, "{common}}}"),
            None => f.write_str("unset}"),
        }
    }
}

//! Engine configuration, loaded from TOML.
//!
//! The two selection anomalies the engine can produce are reported either
//! way; the config decides whether they also fail serialization.
//!
//! ```toml
//! stray_permissions = "drop"
//! empty_groups = "flag"
//! bulk_requires_multiple = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use rolekit_contracts::error::{RolekitError, RolekitResult};

/// Handling of checked permissions whose owning group is not selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrayPolicy {
    /// Omit them from the payload and list them in the report.
    #[default]
    Drop,
    /// Fail serialization with `InconsistentSelection`.
    Reject,
}

/// Handling of selected groups with no checked permissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyGroupPolicy {
    /// Keep the group in the payload and list it in the report.
    #[default]
    Flag,
    /// Fail serialization with `InconsistentSelection`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub stray_permissions: StrayPolicy,

    #[serde(default)]
    pub empty_groups: EmptyGroupPolicy,

    /// Offer select-all/deselect-all only for groups with more than one permission.
    #[serde(default = "default_bulk_requires_multiple")]
    pub bulk_requires_multiple: bool,
}

fn default_bulk_requires_multiple() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stray_permissions: StrayPolicy::default(),
            empty_groups: EmptyGroupPolicy::default(),
            bulk_requires_multiple: default_bulk_requires_multiple(),
        }
    }
}

impl EngineConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `RolekitError::ConfigError` if the TOML is malformed or names
    /// an unknown policy.
    pub fn from_toml_str(s: &str) -> RolekitResult<Self> {
        toml::from_str(s).map_err(|e| RolekitError::ConfigError {
            reason: format!("failed to parse engine config: {}", e),
        })
    }

    /// Read the file at `path` and parse it as engine configuration.
    pub fn from_file(path: &Path) -> RolekitResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| RolekitError::ConfigError {
            reason: format!("failed to read engine config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

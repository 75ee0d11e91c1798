//! Serializes a selection into the minimal two-tier payload.
//!
//! Algorithm:
//!
//! 1. Every selected group id goes into `permissionGroup`, catalog order
//!    first, then orphan ids in lexical order.
//! 2. A fully checked group contributes nothing more; the directory reads
//!    group membership as "all current permissions of this group".
//! 3. Any other selected group contributes its checked permissions (possibly
//!    none) to `permissions`.
//! 4. Checked permissions whose group is not selected are never sent.
//!
//! Empty lists are omitted from the payload entirely.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use rolekit_contracts::{
    catalog::{GroupId, PermissionCatalog, PermissionId},
    error::{RolekitError, RolekitResult},
    role::SelectionPayload,
    selection::SelectionState,
};

use crate::config::{EmptyGroupPolicy, EngineConfig, StrayPolicy};
use crate::store::{checked_in_group, is_fully_checked};

/// Anomalies found while serializing. Empty for a selection built only
/// through the toggles with at least one permission per selected group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializationReport {
    /// Selected groups with no checked permissions (orphans included).
    pub empty_groups: Vec<GroupId>,
    /// Selected group ids the catalog does not contain.
    pub orphan_groups: Vec<GroupId>,
    /// Checked permissions left out because no selected group owns them.
    pub dropped_permissions: Vec<PermissionId>,
}

impl SerializationReport {
    pub fn is_clean(&self) -> bool {
        self.empty_groups.is_empty()
            && self.orphan_groups.is_empty()
            && self.dropped_permissions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serialization {
    pub payload: SelectionPayload,
    pub report: SerializationReport,
}

#[derive(Debug, Clone, Default)]
pub struct Serializer {
    config: EngineConfig,
}

impl Serializer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compute the payload for `state`. Pure; the same inputs always produce
    /// the same output.
    ///
    /// Returns `InconsistentSelection` only when the config rejects an
    /// anomaly that the report would otherwise carry.
    pub fn serialize(
        &self,
        catalog: &PermissionCatalog,
        state: &SelectionState,
    ) -> RolekitResult<Serialization> {
        let mut groups: Vec<&GroupId> = state.selected_groups.iter().collect();
        let position = |g: &GroupId| catalog.position(g).unwrap_or(usize::MAX);
        groups.sort_by(|a, b| position(*a).cmp(&position(*b)).then_with(|| a.cmp(b)));

        let mut report = SerializationReport::default();
        let mut permissions: Vec<PermissionId> = Vec::new();
        let mut reachable: BTreeSet<&PermissionId> = BTreeSet::new();

        for group in &groups {
            let checked = checked_in_group(catalog, state, group);
            reachable.extend(checked.iter().copied());

            if !catalog.contains_group(group) {
                report.orphan_groups.push((*group).clone());
            }
            if checked.is_empty() {
                report.empty_groups.push((*group).clone());
            }
            if !is_fully_checked(catalog, state, group) {
                permissions.extend(checked.into_iter().cloned());
            }
        }

        report.dropped_permissions = state
            .checked_permissions
            .iter()
            .filter(|p| !reachable.contains(p))
            .cloned()
            .collect();

        self.enforce(&report)?;

        let payload = SelectionPayload {
            permission_group: (!groups.is_empty())
                .then(|| groups.into_iter().cloned().collect()),
            permissions: (!permissions.is_empty()).then_some(permissions),
        };

        debug!(
            groups = payload.permission_group.as_ref().map_or(0, Vec::len),
            permissions = payload.permissions.as_ref().map_or(0, Vec::len),
            "selection serialized"
        );

        Ok(Serialization { payload, report })
    }

    fn enforce(&self, report: &SerializationReport) -> RolekitResult<()> {
        if !report.empty_groups.is_empty() {
            let ids = join_ids(report.empty_groups.iter().map(|g| g.0.as_str()));
            match self.config.empty_groups {
                EmptyGroupPolicy::Flag => {
                    warn!(groups = %ids, "selected groups have no checked permissions");
                }
                EmptyGroupPolicy::Reject => {
                    return Err(RolekitError::InconsistentSelection {
                        reason: format!("selected groups with no checked permissions: {}", ids),
                    });
                }
            }
        }

        if !report.dropped_permissions.is_empty() {
            let ids = join_ids(report.dropped_permissions.iter().map(|p| p.0.as_str()));
            match self.config.stray_permissions {
                StrayPolicy::Drop => {
                    warn!(permissions = %ids, "checked permissions outside selected groups dropped");
                }
                StrayPolicy::Reject => {
                    return Err(RolekitError::InconsistentSelection {
                        reason: format!("checked permissions outside selected groups: {}", ids),
                    });
                }
            }
        }

        Ok(())
    }
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(", ")
}

//! Seeds a selection from a previously persisted role (edit mode).
//!
//! No reconciliation against the catalog happens here. Ids the catalog no
//! longer knows are carried as orphans and reported, never dropped.

use tracing::{debug, warn};

use rolekit_contracts::{
    catalog::{GroupId, PermissionCatalog, PermissionId},
    role::RoleRecord,
    selection::SelectionState,
};

/// Orphan ids found while hydrating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub orphan_groups: Vec<GroupId>,
    pub orphan_permissions: Vec<PermissionId>,
}

impl HydrationReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_groups.is_empty() && self.orphan_permissions.is_empty()
    }
}

/// Build a state directly from persisted group and permission ids.
pub fn hydrate_ids<G, P>(groups: G, permissions: P) -> SelectionState
where
    G: IntoIterator<Item = GroupId>,
    P: IntoIterator<Item = PermissionId>,
{
    SelectionState {
        selected_groups: groups.into_iter().collect(),
        checked_permissions: permissions.into_iter().collect(),
    }
}

/// Hydrate from a fetched role, reporting ids absent from `catalog`.
pub fn hydrate_role(record: &RoleRecord, catalog: &PermissionCatalog) -> (SelectionState, HydrationReport) {
    let state = hydrate_ids(
        record.permission_groups.iter().map(|g| g.id.clone()),
        record.permissions.iter().map(|p| p.id.clone()),
    );

    let report = HydrationReport {
        orphan_groups: state
            .selected_groups
            .iter()
            .filter(|g| !catalog.contains_group(g))
            .cloned()
            .collect(),
        orphan_permissions: state
            .checked_permissions
            .iter()
            .filter(|p| !catalog.contains_permission(p))
            .cloned()
            .collect(),
    };

    if !report.is_clean() {
        warn!(
            role_id = %record.id,
            orphan_groups = report.orphan_groups.len(),
            orphan_permissions = report.orphan_permissions.len(),
            "role references ids missing from the catalog"
        );
    }

    debug!(
        role_id = %record.id,
        groups = state.selected_groups.len(),
        permissions = state.checked_permissions.len(),
        "selection hydrated from role"
    );

    (state, report)
}

//! The selection state store and its toggle operations.
//!
//! `selected_groups` and `checked_permissions` are updated by independent
//! rules. Checking a permission opts its group in; unchecking never opts it
//! out. Only `toggle_group(.., false)` removes a group.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use rolekit_contracts::{
    catalog::{GroupId, PermissionCatalog, PermissionId},
    error::{RolekitError, RolekitResult},
    selection::SelectionState,
};

use crate::config::EngineConfig;

// ── Derived views ─────────────────────────────────────────────────────────────

/// Permissions of `group` that are currently checked, in catalog order.
///
/// Empty for a group the catalog does not know.
pub fn checked_in_group<'a>(
    catalog: &'a PermissionCatalog,
    state: &SelectionState,
    group: &GroupId,
) -> Vec<&'a PermissionId> {
    catalog
        .group_permission_ids(group)
        .into_iter()
        .filter(|p| state.checked_permissions.contains(*p))
        .collect()
}

/// True when every permission of `group` is checked.
///
/// False for unknown groups.
pub fn is_fully_checked(catalog: &PermissionCatalog, state: &SelectionState, group: &GroupId) -> bool {
    match catalog.group(group) {
        Some(g) => g.permission_ids().all(|p| state.checked_permissions.contains(p)),
        None => false,
    }
}

/// True when `group` is touched but not fully checked.
///
/// A group is touched when it is selected or has a checked permission, so a
/// selected group with nothing checked (including an orphan group) counts as
/// partial.
pub fn is_partially_checked(
    catalog: &PermissionCatalog,
    state: &SelectionState,
    group: &GroupId,
) -> bool {
    let touched =
        state.is_selected(group) || !checked_in_group(catalog, state, group).is_empty();
    touched && !is_fully_checked(catalog, state, group)
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Owns the `SelectionState` of one editing session against a fixed catalog.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    catalog: Arc<PermissionCatalog>,
    state: SelectionState,
    bulk_requires_multiple: bool,
}

impl SelectionStore {
    /// An empty selection, as for a new role.
    pub fn new(catalog: Arc<PermissionCatalog>, config: &EngineConfig) -> Self {
        Self::with_state(catalog, SelectionState::default(), config)
    }

    /// A store seeded with `state`, as produced by the hydrator.
    ///
    /// `state` is taken as-is; ids unknown to the catalog are carried until a
    /// toggle removes them.
    pub fn with_state(
        catalog: Arc<PermissionCatalog>,
        state: SelectionState,
        config: &EngineConfig,
    ) -> Self {
        Self {
            catalog,
            state,
            bulk_requires_multiple: config.bulk_requires_multiple,
        }
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    pub fn shared_catalog(&self) -> Arc<PermissionCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// A copy of the current state, safe to serialize while edits continue.
    pub fn snapshot(&self) -> SelectionState {
        self.state.clone()
    }

    /// Turn a whole group on or off.
    ///
    /// On selects the group and checks all of its permissions. Off deselects
    /// it and unchecks all of its permissions. Turning off a hydrated group
    /// the catalog no longer knows removes the orphan id.
    pub fn toggle_group(&mut self, group: &GroupId, on: bool) -> RolekitResult<()> {
        let known = self.catalog.contains_group(group);
        if !known && (on || !self.state.is_selected(group)) {
            return Err(RolekitError::UnknownGroup {
                group_id: group.0.clone(),
            });
        }

        let members: Vec<PermissionId> = self
            .catalog
            .group_permission_ids(group)
            .into_iter()
            .cloned()
            .collect();

        if on {
            self.state.selected_groups.insert(group.clone());
            self.state.checked_permissions.extend(members);
        } else {
            self.state.selected_groups.remove(group);
            for p in &members {
                self.state.checked_permissions.remove(p);
            }
        }

        debug!(group_id = %group, on, orphan = !known, "group toggled");
        Ok(())
    }

    /// Check or uncheck a single permission.
    ///
    /// Checking also selects the owning group if it is not selected yet.
    /// Unchecking leaves group selection untouched.
    pub fn toggle_permission(&mut self, permission: &PermissionId, on: bool) -> RolekitResult<()> {
        let owner = self.catalog.owner_of(permission).cloned();

        match (owner, on) {
            (Some(owner), true) => {
                self.state.checked_permissions.insert(permission.clone());
                let newly_selected = self.state.selected_groups.insert(owner.clone());
                debug!(
                    permission_id = %permission,
                    group_id = %owner,
                    group_auto_selected = newly_selected,
                    "permission checked"
                );
            }
            (Some(owner), false) => {
                self.state.checked_permissions.remove(permission);
                debug!(permission_id = %permission, group_id = %owner, "permission unchecked");
            }
            (None, false) if self.state.is_checked(permission) => {
                self.state.checked_permissions.remove(permission);
                debug!(permission_id = %permission, "orphan permission unchecked");
            }
            (None, _) => {
                return Err(RolekitError::UnknownPermission {
                    permission_id: permission.0.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether select-all/deselect-all is offered for `group`.
    pub fn bulk_available(&self, group: &GroupId) -> bool {
        match self.catalog.group(group) {
            Some(g) => !self.bulk_requires_multiple || g.permissions.len() > 1,
            None => false,
        }
    }

    /// Check every permission of an already-selected group.
    pub fn select_all_in_group(&mut self, group: &GroupId) -> RolekitResult<()> {
        let members = self.bulk_members(group)?;
        self.state.checked_permissions.extend(members);
        debug!(group_id = %group, "all permissions in group checked");
        Ok(())
    }

    /// Uncheck every permission of an already-selected group, keeping it selected.
    pub fn deselect_all_in_group(&mut self, group: &GroupId) -> RolekitResult<()> {
        let members = self.bulk_members(group)?;
        for p in &members {
            self.state.checked_permissions.remove(p);
        }
        debug!(group_id = %group, "all permissions in group unchecked");
        Ok(())
    }

    fn bulk_members(&self, group: &GroupId) -> RolekitResult<BTreeSet<PermissionId>> {
        if !self.catalog.contains_group(group) {
            return Err(RolekitError::UnknownGroup {
                group_id: group.0.clone(),
            });
        }
        if !self.state.is_selected(group) {
            return Err(RolekitError::InconsistentSelection {
                reason: format!("group '{}' must be selected before bulk selection", group),
            });
        }
        if !self.bulk_available(group) {
            return Err(RolekitError::InconsistentSelection {
                reason: format!("bulk selection is not offered for single-permission group '{}'", group),
            });
        }
        Ok(self
            .catalog
            .group_permission_ids(group)
            .into_iter()
            .cloned()
            .collect())
    }
}

//! Tri-state projection of the selection for rendering.
//!
//! `display` follows explicit group selection, not coverage: a selected group
//! renders checked even when only some of its permissions are. The
//! indeterminate state only appears for an unselected group with checked
//! permissions, which the toggles never produce on their own.

use serde::Serialize;

use rolekit_contracts::{
    catalog::{GroupId, PermissionId},
    selection::SelectionState,
};

use crate::store::{checked_in_group, is_fully_checked, is_partially_checked, SelectionStore};

/// The checkbox state a group header renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    Checked,
    Indeterminate,
    Unchecked,
}

/// How much of a group is covered by checked permissions.
///
/// `Empty` only applies to unselected groups; a selected group with nothing
/// checked is `Partial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Full,
    Partial,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionView {
    pub id: PermissionId,
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub display: TriState,
    pub coverage: Coverage,
    pub checked_count: usize,
    pub total_count: usize,
    pub bulk_available: bool,
    /// Selected group id that the catalog no longer contains.
    pub orphan: bool,
    pub permissions: Vec<PermissionView>,
}

impl GroupView {
    pub fn display_checked(&self) -> bool {
        self.display == TriState::Checked
    }

    pub fn display_indeterminate(&self) -> bool {
        self.display == TriState::Indeterminate
    }
}

fn display_state(selected: bool, checked: usize) -> TriState {
    match (selected, checked) {
        (true, _) => TriState::Checked,
        (false, 0) => TriState::Unchecked,
        (false, _) => TriState::Indeterminate,
    }
}

/// Project every catalog group, then any selected orphan groups in id order.
pub fn project(store: &SelectionStore) -> Vec<GroupView> {
    let catalog = store.catalog();
    let state: &SelectionState = store.state();

    let mut views: Vec<GroupView> = catalog
        .groups()
        .iter()
        .map(|group| {
            let checked = checked_in_group(catalog, state, &group.id).len();
            let coverage = if is_fully_checked(catalog, state, &group.id) {
                Coverage::Full
            } else if is_partially_checked(catalog, state, &group.id) {
                Coverage::Partial
            } else {
                Coverage::Empty
            };

            GroupView {
                id: group.id.clone(),
                name: group.name.clone(),
                description: group.description.clone(),
                display: display_state(state.is_selected(&group.id), checked),
                coverage,
                checked_count: checked,
                total_count: group.permissions.len(),
                bulk_available: store.bulk_available(&group.id),
                orphan: false,
                permissions: group
                    .permissions
                    .iter()
                    .map(|p| PermissionView {
                        id: p.id.clone(),
                        name: p.name.clone(),
                        checked: state.is_checked(&p.id),
                    })
                    .collect(),
            }
        })
        .collect();

    // Orphans degrade to "partially checked but effectively empty".
    views.extend(
        state
            .selected_groups
            .iter()
            .filter(|g| !catalog.contains_group(g))
            .map(|g| GroupView {
                id: g.clone(),
                name: g.0.clone(),
                description: String::new(),
                display: TriState::Checked,
                coverage: Coverage::Partial,
                checked_count: 0,
                total_count: 0,
                bulk_available: false,
                orphan: true,
                permissions: Vec::new(),
            }),
    );

    views
}

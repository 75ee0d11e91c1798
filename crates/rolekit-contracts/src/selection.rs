//! The mutable selection state of one role editing session.
//!
//! Two loosely coupled sets: groups the operator turned on, and permissions
//! currently checked. Neither is required to be consistent with the other;
//! the transition rules live in `rolekit-selection`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{GroupId, PermissionId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    /// Groups explicitly turned on (or implicitly by checking a permission).
    pub selected_groups: BTreeSet<GroupId>,
    /// Checked permissions, independent of group bookkeeping.
    pub checked_permissions: BTreeSet<PermissionId>,
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        self.selected_groups.is_empty() && self.checked_permissions.is_empty()
    }

    pub fn is_selected(&self, group: &GroupId) -> bool {
        self.selected_groups.contains(group)
    }

    pub fn is_checked(&self, permission: &PermissionId) -> bool {
        self.checked_permissions.contains(permission)
    }
}

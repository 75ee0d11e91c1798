//! Role wire types exchanged with the role directory.
//!
//! `RoleRecord` is what the directory returns for a role; `RolePayload` is
//! what a create or update sends. Field names follow the directory's
//! camelCase JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{GroupId, PermissionId};

/// Identifier of a persisted role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The organizational level a role applies at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLevel {
    Church,
    Branch,
    Department,
    Unit,
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScopeLevel::Church => "church",
            ScopeLevel::Branch => "branch",
            ScopeLevel::Department => "department",
            ScopeLevel::Unit => "unit",
        };
        f.write_str(label)
    }
}

/// A group reference as embedded in a fetched role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: GroupId,
    pub name: String,
}

/// A permission reference as embedded in a fetched role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRef {
    pub id: PermissionId,
    pub name: String,
    pub group: GroupRef,
}

/// A role as returned by the role directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub scope_level: ScopeLevel,
    #[serde(default)]
    pub permission_groups: Vec<GroupRef>,
    #[serde(default)]
    pub permissions: Vec<PermissionRef>,
}

/// The selection-derived fields of a create or update request.
///
/// An absent field means "nothing to report", never "clear existing grants".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPayload {
    #[serde(
        rename = "permissionGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub permission_group: Option<Vec<GroupId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionId>>,
}

/// The operator-entered form fields of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub scope_level: ScopeLevel,
}

/// The full body of a role create (`POST`) or update (`PATCH`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePayload {
    pub name: String,
    pub description: String,
    pub scope_level: ScopeLevel,
    #[serde(flatten)]
    pub selection: SelectionPayload,
}

impl RolePayload {
    pub fn new(draft: RoleDraft, selection: SelectionPayload) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            scope_level: draft.scope_level,
            selection,
        }
    }
}

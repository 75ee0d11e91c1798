//! Permission catalog types.
//!
//! A catalog is an ordered list of permission groups, each owning an ordered
//! list of permissions. It is fetched once per editing session and treated as
//! immutable ground truth for group membership.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RolekitError, RolekitResult};

/// Opaque identifier of a permission group.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a single permission.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(pub String);

impl PermissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An atomic grantable capability, owned by exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    /// Owning group. The catalog wire format omits it; `PermissionCatalog::new`
    /// fills it in from the enclosing group.
    #[serde(default)]
    pub group_id: GroupId,
}

/// A named, described collection of permissions; the unit of bulk selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub permissions: Vec<Permission>,
}

impl PermissionGroup {
    /// Build a group from `(id, name)` permission pairs.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: &[(&str, &str)],
    ) -> Self {
        let id = GroupId::new(id);
        let permissions = permissions
            .iter()
            .map(|(pid, pname)| Permission {
                id: PermissionId::new(*pid),
                name: pname.to_string(),
                group_id: id.clone(),
            })
            .collect();
        Self {
            id,
            name: name.into(),
            description: description.into(),
            permissions,
        }
    }

    /// Permission ids in catalog order.
    pub fn permission_ids(&self) -> impl Iterator<Item = &PermissionId> {
        self.permissions.iter().map(|p| &p.id)
    }
}

/// The ordered, indexed set of permission groups for one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PermissionGroup>", into = "Vec<PermissionGroup>")]
pub struct PermissionCatalog {
    groups: Vec<PermissionGroup>,
    group_index: HashMap<GroupId, usize>,
    owner_index: HashMap<PermissionId, GroupId>,
}

impl PermissionCatalog {
    /// Index `groups`, stamping each permission with its owning group.
    ///
    /// Rejects duplicate group ids, permissions claimed by more than one
    /// group, and groups with no permissions.
    pub fn new(mut groups: Vec<PermissionGroup>) -> RolekitResult<Self> {
        let mut group_index = HashMap::with_capacity(groups.len());
        let mut owner_index = HashMap::new();

        for (position, group) in groups.iter_mut().enumerate() {
            if group.permissions.is_empty() {
                return Err(RolekitError::InvalidCatalog {
                    reason: format!("group '{}' has no permissions", group.id),
                });
            }
            if group_index.insert(group.id.clone(), position).is_some() {
                return Err(RolekitError::InvalidCatalog {
                    reason: format!("duplicate group id '{}'", group.id),
                });
            }
            for permission in &mut group.permissions {
                permission.group_id = group.id.clone();
                if let Some(owner) = owner_index.insert(permission.id.clone(), group.id.clone()) {
                    return Err(RolekitError::InvalidCatalog {
                        reason: format!(
                            "permission '{}' is claimed by both '{}' and '{}'",
                            permission.id, owner, group.id
                        ),
                    });
                }
            }
        }

        Ok(Self {
            groups,
            group_index,
            owner_index,
        })
    }

    /// Groups in catalog order.
    pub fn groups(&self) -> &[PermissionGroup] {
        &self.groups
    }

    pub fn group(&self, id: &GroupId) -> Option<&PermissionGroup> {
        self.group_index.get(id).map(|&i| &self.groups[i])
    }

    /// Catalog position of a group, used for deterministic ordering.
    pub fn position(&self, id: &GroupId) -> Option<usize> {
        self.group_index.get(id).copied()
    }

    /// The group that owns `permission`, if the permission is in the catalog.
    pub fn owner_of(&self, permission: &PermissionId) -> Option<&GroupId> {
        self.owner_index.get(permission)
    }

    pub fn contains_group(&self, id: &GroupId) -> bool {
        self.group_index.contains_key(id)
    }

    pub fn contains_permission(&self, id: &PermissionId) -> bool {
        self.owner_index.contains_key(id)
    }

    /// Permission ids of `group` in catalog order; empty for an unknown group.
    pub fn group_permission_ids(&self, group: &GroupId) -> Vec<&PermissionId> {
        self.group(group)
            .map(|g| g.permission_ids().collect())
            .unwrap_or_default()
    }

    pub fn permission(&self, id: &PermissionId) -> Option<&Permission> {
        let owner = self.owner_index.get(id)?;
        self.group(owner)?.permissions.iter().find(|p| &p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl TryFrom<Vec<PermissionGroup>> for PermissionCatalog {
    type Error = RolekitError;

    fn try_from(groups: Vec<PermissionGroup>) -> RolekitResult<Self> {
        Self::new(groups)
    }
}

impl From<PermissionCatalog> for Vec<PermissionGroup> {
    fn from(catalog: PermissionCatalog) -> Self {
        catalog.groups
    }
}

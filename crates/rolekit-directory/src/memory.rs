//! In-memory implementations of `CatalogSource` and `RoleDirectory`.
//!
//! `InMemoryRoleDirectory` keeps roles in a `BTreeMap` behind
//! `Arc<Mutex<_>>`, so clones of the directory observe the same roles while
//! sessions write through it.
//!
//! Stored roles keep the two-tier encoding they were written with. When a
//! role is read back, each group is decoded: explicit permissions of that
//! group if any were sent, otherwise every current permission of the group.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rolekit_contracts::{
    catalog::{GroupId, PermissionCatalog, PermissionId},
    error::{RolekitError, RolekitResult},
    role::{GroupRef, PermissionRef, RoleId, RolePayload, RoleRecord, ScopeLevel},
};
use rolekit_core::traits::{CatalogSource, RoleDirectory};

// ── Catalog ───────────────────────────────────────────────────────────────────

/// A catalog source serving a fixed catalog, with a switchable outage.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    catalog: Arc<PermissionCatalog>,
    outage: Arc<Mutex<Option<String>>>,
}

impl InMemoryCatalog {
    pub fn new(catalog: PermissionCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            outage: Arc::new(Mutex::new(None)),
        }
    }

    /// Parse the catalog wire format: `[{id, name, description, permissions: [{id, name}]}]`.
    pub fn from_json_str(s: &str) -> RolekitResult<Self> {
        let catalog: PermissionCatalog =
            serde_json::from_str(s).map_err(|e| RolekitError::InvalidCatalog {
                reason: format!("failed to parse catalog JSON: {}", e),
            })?;
        Ok(Self::new(catalog))
    }

    /// Make every following fetch fail with `reason` until `restore` is called.
    pub fn fail_with(&self, reason: impl Into<String>) -> RolekitResult<()> {
        *self.lock()? = Some(reason.into());
        Ok(())
    }

    pub fn restore(&self) -> RolekitResult<()> {
        *self.lock()? = None;
        Ok(())
    }

    pub fn catalog(&self) -> Arc<PermissionCatalog> {
        Arc::clone(&self.catalog)
    }
}

impl InMemoryCatalog {
    fn lock(&self) -> RolekitResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.outage.lock().map_err(|e| RolekitError::CatalogUnavailable {
            reason: format!("catalog lock poisoned: {}", e),
        })
    }
}

impl CatalogSource for InMemoryCatalog {
    fn list_permission_groups(&self) -> RolekitResult<PermissionCatalog> {
        let outage = self.lock()?;
        if let Some(reason) = outage.as_ref() {
            return Err(RolekitError::CatalogUnavailable {
                reason: reason.clone(),
            });
        }
        Ok((*self.catalog).clone())
    }
}

// ── Role directory ────────────────────────────────────────────────────────────

/// How an update treats selection fields absent from the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateSemantics {
    /// An absent field clears the stored grants of that tier.
    #[default]
    Replace,
    /// An absent field keeps the stored grants of that tier.
    Merge,
}

/// A role as the directory stores it: the encoded grants, not the decoded ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRole {
    pub id: RoleId,
    pub name: String,
    pub description: String,
    pub scope_level: ScopeLevel,
    pub groups: Vec<GroupRef>,
    pub permissions: Vec<PermissionRef>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub(crate) struct DirectoryState {
    pub(crate) roles: BTreeMap<RoleId, StoredRole>,
    pub(crate) outage: Option<String>,
}

/// An in-memory role directory validating writes against a catalog.
///
/// Unknown permission ids are rejected. Unknown group ids are carried through
/// as zero-permission groups, matching how stale roles are read back.
#[derive(Clone)]
pub struct InMemoryRoleDirectory {
    catalog: Arc<PermissionCatalog>,
    semantics: UpdateSemantics,
    pub(crate) state: Arc<Mutex<DirectoryState>>,
}

impl InMemoryRoleDirectory {
    pub fn new(catalog: Arc<PermissionCatalog>, semantics: UpdateSemantics) -> Self {
        Self {
            catalog,
            semantics,
            state: Arc::new(Mutex::new(DirectoryState::default())),
        }
    }

    /// Store `record` verbatim, bypassing validation.
    ///
    /// Used to stage roles that predate the current catalog.
    pub fn seed_role(&self, record: RoleRecord) -> RolekitResult<()> {
        let mut state = self.lock()?;
        let stored = StoredRole {
            id: record.id.clone(),
            name: record.name,
            description: record.description,
            scope_level: record.scope_level,
            groups: record.permission_groups,
            permissions: record.permissions,
            updated_at: Utc::now(),
        };
        state.roles.insert(record.id, stored);
        Ok(())
    }

    /// Make every following request fail with `reason` until `restore` is called.
    pub fn fail_with(&self, reason: impl Into<String>) -> RolekitResult<()> {
        self.lock()?.outage = Some(reason.into());
        Ok(())
    }

    pub fn restore(&self) -> RolekitResult<()> {
        self.lock()?.outage = None;
        Ok(())
    }

    /// The encoded grants of a role, as last written.
    pub fn stored(&self, id: &RoleId) -> RolekitResult<StoredRole> {
        self.lock()?
            .roles
            .get(id)
            .cloned()
            .ok_or_else(|| RolekitError::RoleNotFound { role_id: id.0.clone() })
    }

    /// Every role, decoded, in id order.
    pub fn roles(&self) -> RolekitResult<Vec<RoleRecord>> {
        let state = self.lock()?;
        Ok(state.roles.values().map(|r| self.decode(r)).collect())
    }

    /// Decode a stored role's two-tier grants into its effective permissions.
    ///
    /// A group with explicit permissions grants exactly those. A group
    /// without any grants every permission it currently has.
    pub fn effective_permissions(&self, role: &StoredRole) -> Vec<PermissionRef> {
        let mut effective = Vec::new();

        for group in &role.groups {
            let explicit: Vec<&PermissionRef> = role
                .permissions
                .iter()
                .filter(|p| p.group.id == group.id)
                .collect();

            if !explicit.is_empty() {
                effective.extend(explicit.into_iter().cloned());
                continue;
            }

            if let Some(current) = self.catalog.group(&group.id) {
                effective.extend(current.permissions.iter().map(|p| PermissionRef {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    group: GroupRef {
                        id: current.id.clone(),
                        name: current.name.clone(),
                    },
                }));
            }
        }

        // Explicit grants outside any stored group are kept as written.
        effective.extend(
            role.permissions
                .iter()
                .filter(|p| !role.groups.iter().any(|g| g.id == p.group.id))
                .cloned(),
        );
        effective
    }

    fn decode(&self, role: &StoredRole) -> RoleRecord {
        RoleRecord {
            id: role.id.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
            scope_level: role.scope_level,
            permission_groups: role.groups.clone(),
            permissions: self.effective_permissions(role),
        }
    }

    fn lock(&self) -> RolekitResult<std::sync::MutexGuard<'_, DirectoryState>> {
        self.state.lock().map_err(|e| RolekitError::DirectoryFailed {
            reason: format!("directory state lock poisoned: {}", e),
        })
    }

    fn check_outage(state: &DirectoryState) -> RolekitResult<()> {
        match &state.outage {
            Some(reason) => Err(RolekitError::DirectoryFailed {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Resolve group ids to refs. Ids the catalog no longer knows are kept as
    /// zero-permission groups named after the stored ref, or the id itself.
    fn group_refs(&self, ids: &[GroupId], previous: &[GroupRef]) -> Vec<GroupRef> {
        ids.iter()
            .map(|id| match self.catalog.group(id) {
                Some(group) => GroupRef {
                    id: group.id.clone(),
                    name: group.name.clone(),
                },
                None => {
                    warn!(group_id = %id, "group not in catalog, stored without permissions");
                    previous
                        .iter()
                        .find(|g| &g.id == id)
                        .cloned()
                        .unwrap_or_else(|| GroupRef {
                            id: id.clone(),
                            name: id.0.clone(),
                        })
                }
            })
            .collect()
    }

    fn permission_refs(&self, ids: &[PermissionId]) -> RolekitResult<Vec<PermissionRef>> {
        ids.iter()
            .map(|id| {
                let unknown = || RolekitError::UnknownPermission {
                    permission_id: id.0.clone(),
                };
                let permission = self.catalog.permission(id).ok_or_else(unknown)?;
                let group = self.catalog.group(&permission.group_id).ok_or_else(unknown)?;
                Ok(PermissionRef {
                    id: permission.id.clone(),
                    name: permission.name.clone(),
                    group: GroupRef {
                        id: group.id.clone(),
                        name: group.name.clone(),
                    },
                })
            })
            .collect()
    }

    fn validate_name(payload: &RolePayload) -> RolekitResult<()> {
        if payload.name.trim().is_empty() {
            return Err(RolekitError::InvalidRole {
                reason: "role name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl RoleDirectory for InMemoryRoleDirectory {
    fn fetch_role(&self, id: &RoleId) -> RolekitResult<RoleRecord> {
        let state = self.lock()?;
        Self::check_outage(&state)?;
        let role = state
            .roles
            .get(id)
            .ok_or_else(|| RolekitError::RoleNotFound { role_id: id.0.clone() })?;
        debug!(role_id = %id, "role fetched");
        Ok(self.decode(role))
    }

    fn create_role(&self, payload: &RolePayload) -> RolekitResult<RoleRecord> {
        Self::validate_name(payload)?;
        let permissions = self.permission_refs(payload.selection.permissions.as_deref().unwrap_or_default())?;

        let mut state = self.lock()?;
        Self::check_outage(&state)?;
        let groups = self.group_refs(
            payload.selection.permission_group.as_deref().unwrap_or_default(),
            &[],
        );

        let id = RoleId::new(uuid::Uuid::new_v4().to_string());
        let stored = StoredRole {
            id: id.clone(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            scope_level: payload.scope_level,
            groups,
            permissions,
            updated_at: Utc::now(),
        };
        let record = self.decode(&stored);
        state.roles.insert(id.clone(), stored);

        info!(role_id = %id, name = %payload.name, "role created");
        Ok(record)
    }

    fn update_role(&self, id: &RoleId, payload: &RolePayload) -> RolekitResult<RoleRecord> {
        Self::validate_name(payload)?;
        let permissions = payload
            .selection
            .permissions
            .as_deref()
            .map(|ids| self.permission_refs(ids))
            .transpose()?;

        let mut state = self.lock()?;
        Self::check_outage(&state)?;
        let semantics = self.semantics;
        let role = state
            .roles
            .get_mut(id)
            .ok_or_else(|| RolekitError::RoleNotFound { role_id: id.0.clone() })?;
        let groups = payload
            .selection
            .permission_group
            .as_deref()
            .map(|ids| self.group_refs(ids, &role.groups));

        role.name = payload.name.clone();
        role.description = payload.description.clone();
        role.scope_level = payload.scope_level;
        match (semantics, groups) {
            (_, Some(groups)) => role.groups = groups,
            (UpdateSemantics::Replace, None) => role.groups.clear(),
            (UpdateSemantics::Merge, None) => {}
        }
        match (semantics, permissions) {
            (_, Some(permissions)) => role.permissions = permissions,
            (UpdateSemantics::Replace, None) => role.permissions.clear(),
            (UpdateSemantics::Merge, None) => {}
        }
        role.updated_at = Utc::now();

        if role.groups.is_empty() && role.permissions.is_empty() {
            warn!(role_id = %id, "role updated with no remaining grants");
        }
        info!(role_id = %id, semantics = ?semantics, "role updated");

        let role = role.clone();
        Ok(self.decode(&role))
    }
}

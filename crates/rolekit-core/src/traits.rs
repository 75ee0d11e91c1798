//! Collaborator traits for the role editing session.
//!
//! The engine never talks HTTP itself. These two traits are the whole
//! boundary:
//!
//! - `CatalogSource` — lists the permission groups for the current tenant
//! - `RoleDirectory` — fetches, creates, and updates roles
//!
//! Both are read once (catalog, role) or written once (submit) per session.

use std::sync::Arc;

use rolekit_contracts::{
    catalog::PermissionCatalog,
    error::RolekitResult,
    role::{RoleId, RolePayload, RoleRecord},
};

/// The permission catalog backend.
pub trait CatalogSource: Send + Sync {
    /// Fetch every permission group, in display order.
    ///
    /// Failures are reported as `RolekitError::CatalogUnavailable`; the
    /// session treats them as non-fatal.
    fn list_permission_groups(&self) -> RolekitResult<PermissionCatalog>;
}

/// The role directory backend.
pub trait RoleDirectory: Send + Sync {
    /// Fetch a persisted role by id.
    fn fetch_role(&self, id: &RoleId) -> RolekitResult<RoleRecord>;

    /// Persist a new role and return it as stored.
    fn create_role(&self, payload: &RolePayload) -> RolekitResult<RoleRecord>;

    /// Apply `payload` to an existing role and return it as stored.
    ///
    /// Whether absent selection fields clear or keep existing grants is the
    /// directory's decision.
    fn update_role(&self, id: &RoleId, payload: &RolePayload) -> RolekitResult<RoleRecord>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for Arc<T> {
    fn list_permission_groups(&self) -> RolekitResult<PermissionCatalog> {
        (**self).list_permission_groups()
    }
}

impl<T: RoleDirectory + ?Sized> RoleDirectory for Arc<T> {
    fn fetch_role(&self, id: &RoleId) -> RolekitResult<RoleRecord> {
        (**self).fetch_role(id)
    }

    fn create_role(&self, payload: &RolePayload) -> RolekitResult<RoleRecord> {
        (**self).create_role(payload)
    }

    fn update_role(&self, id: &RoleId, payload: &RolePayload) -> RolekitResult<RoleRecord> {
        (**self).update_role(id, payload)
    }
}

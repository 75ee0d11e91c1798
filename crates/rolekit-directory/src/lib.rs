//! # rolekit-directory
//!
//! In-memory reference backends for the rolekit editing session.
//!
//! `InMemoryCatalog` serves a fixed permission catalog; `InMemoryRoleDirectory`
//! stores roles in their two-tier encoding and decodes them on read. Both can
//! be switched into an outage to exercise the session's non-fatal failure
//! paths.

pub mod memory;

pub use memory::{InMemoryCatalog, InMemoryRoleDirectory, StoredRole, UpdateSemantics};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rolekit_contracts::{
        catalog::{GroupId, PermissionCatalog, PermissionGroup, PermissionId},
        error::RolekitError,
        role::{GroupRef, RoleId, RolePayload, RoleRecord, ScopeLevel, SelectionPayload},
    };
    use rolekit_core::traits::{CatalogSource, RoleDirectory};

    use crate::{InMemoryCatalog, InMemoryRoleDirectory, UpdateSemantics};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn catalog() -> Arc<PermissionCatalog> {
        Arc::new(
            PermissionCatalog::new(vec![
                PermissionGroup::new("A", "Members", "", &[("p1", "view"), ("p2", "edit")]),
                PermissionGroup::new("B", "Finance", "", &[("p3", "view")]),
            ])
            .unwrap(),
        )
    }

    fn payload(groups: Option<&[&str]>, permissions: Option<&[&str]>) -> RolePayload {
        RolePayload {
            name: "Usher".to_string(),
            description: String::new(),
            scope_level: ScopeLevel::Department,
            selection: SelectionPayload {
                permission_group: groups.map(|ids| ids.iter().map(|id| GroupId::new(*id)).collect()),
                permissions: permissions
                    .map(|ids| ids.iter().map(|id| PermissionId::new(*id)).collect()),
            },
        }
    }

    fn effective_ids(record: &RoleRecord) -> Vec<&str> {
        record.permissions.iter().map(|p| p.id.0.as_str()).collect()
    }

    // ── Catalog ───────────────────────────────────────────────────────────────

    #[test]
    fn catalog_outage_and_restore() {
        let source = InMemoryCatalog::new((*catalog()).clone());
        source.fail_with("upstream down").unwrap();

        match source.list_permission_groups() {
            Err(RolekitError::CatalogUnavailable { reason }) => assert_eq!(reason, "upstream down"),
            other => panic!("expected CatalogUnavailable, got {:?}", other),
        }

        source.restore().unwrap();
        assert_eq!(source.list_permission_groups().unwrap().groups().len(), 2);
    }

    #[test]
    fn catalog_from_json() {
        let source = InMemoryCatalog::from_json_str(
            r#"[{"id": "A", "name": "Members", "permissions": [{"id": "p1", "name": "view"}]}]"#,
        )
        .unwrap();
        assert!(source.catalog().contains_permission(&PermissionId::new("p1")));

        assert!(matches!(
            InMemoryCatalog::from_json_str("{"),
            Err(RolekitError::InvalidCatalog { .. })
        ));
    }

    // ── Two-tier decoding ─────────────────────────────────────────────────────

    #[test]
    fn group_without_explicit_permissions_grants_all() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);
        let record = dir.create_role(&payload(Some(&["A"]), None)).unwrap();

        assert_eq!(effective_ids(&record), vec!["p1", "p2"]);
        assert_eq!(record.permission_groups[0].name, "Members");
    }

    #[test]
    fn group_with_explicit_permissions_grants_only_those() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);
        let record = dir
            .create_role(&payload(Some(&["A", "B"]), Some(&["p2"])))
            .unwrap();

        assert_eq!(effective_ids(&record), vec!["p2", "p3"]);
        let stored = dir.stored(&record.id).unwrap();
        assert_eq!(stored.permissions.len(), 1);
    }

    #[test]
    fn create_rejects_unknown_permissions() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);

        assert!(matches!(
            dir.create_role(&payload(Some(&["A"]), Some(&["p9"]))),
            Err(RolekitError::UnknownPermission { .. })
        ));
        assert!(dir.roles().unwrap().is_empty());
    }

    // ── Update semantics ──────────────────────────────────────────────────────

    #[test]
    fn replace_clears_absent_tier() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);
        let created = dir.create_role(&payload(Some(&["A"]), Some(&["p1"]))).unwrap();

        let updated = dir
            .update_role(&created.id, &payload(Some(&["A"]), None))
            .unwrap();
        assert_eq!(effective_ids(&updated), vec!["p1", "p2"]);
    }

    #[test]
    fn merge_keeps_absent_tier() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Merge);
        let created = dir.create_role(&payload(Some(&["A"]), Some(&["p1"]))).unwrap();

        let updated = dir
            .update_role(&created.id, &payload(Some(&["A"]), None))
            .unwrap();
        assert_eq!(effective_ids(&updated), vec!["p1"]);
    }

    #[test]
    fn update_missing_role() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);
        assert!(matches!(
            dir.update_role(&RoleId::new("nope"), &payload(None, None)),
            Err(RolekitError::RoleNotFound { .. })
        ));
    }

    #[test]
    fn outage_fails_fetch_and_write() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);
        let created = dir.create_role(&payload(Some(&["B"]), None)).unwrap();
        dir.fail_with("maintenance").unwrap();

        assert!(matches!(
            dir.fetch_role(&created.id),
            Err(RolekitError::DirectoryFailed { .. })
        ));
        assert!(matches!(
            dir.create_role(&payload(Some(&["B"]), None)),
            Err(RolekitError::DirectoryFailed { .. })
        ));

        dir.restore().unwrap();
        assert_eq!(dir.fetch_role(&created.id).unwrap().id, created.id);
    }

    #[test]
    fn seeded_stale_group_decodes_to_nothing() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);
        dir.seed_role(RoleRecord {
            id: RoleId::new("legacy"),
            name: "Legacy".to_string(),
            description: String::new(),
            scope_level: ScopeLevel::Church,
            permission_groups: vec![GroupRef {
                id: GroupId::new("retired"),
                name: "Retired".to_string(),
            }],
            permissions: vec![],
        })
        .unwrap();

        let record = dir.fetch_role(&RoleId::new("legacy")).unwrap();
        assert_eq!(record.permission_groups.len(), 1);
        assert!(record.permissions.is_empty());
    }

    #[test]
    fn unknown_group_is_stored_without_permissions() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);
        let record = dir.create_role(&payload(Some(&["Z", "B"]), None)).unwrap();

        assert_eq!(record.permission_groups.len(), 2);
        assert_eq!(record.permission_groups[0].name, "Z");
        assert_eq!(effective_ids(&record), vec!["p3"]);
    }

    #[test]
    fn update_keeps_stale_group_name() {
        let dir = InMemoryRoleDirectory::new(catalog(), UpdateSemantics::Replace);
        dir.seed_role(RoleRecord {
            id: RoleId::new("legacy"),
            name: "Legacy".to_string(),
            description: String::new(),
            scope_level: ScopeLevel::Church,
            permission_groups: vec![GroupRef {
                id: GroupId::new("retired"),
                name: "Retired".to_string(),
            }],
            permissions: vec![],
        })
        .unwrap();

        let updated = dir
            .update_role(&RoleId::new("legacy"), &payload(Some(&["retired", "A"]), Some(&["p1"])))
            .unwrap();
        assert_eq!(updated.permission_groups[0].name, "Retired");
        assert_eq!(effective_ids(&updated), vec!["p1"]);
    }
}

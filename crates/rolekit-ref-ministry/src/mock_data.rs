//! Fictional church administration catalog and roles.
//!
//! Stands in for the tenant's permission catalog and role directory. Nothing
//! here is contacted over the network.

use rolekit_contracts::{
    catalog::{GroupId, PermissionCatalog, PermissionGroup, PermissionId},
    error::RolekitResult,
    role::{GroupRef, PermissionRef, RoleId, RoleRecord, ScopeLevel},
};

/// Group ids used by the scenarios.
pub const MEMBERS: &str = "members";
pub const FINANCE: &str = "finance";
pub const EVENTS: &str = "events";
pub const ANNOUNCEMENTS: &str = "announcements";
pub const SETTINGS: &str = "settings";

/// The catalog served to every scenario.
///
/// - members       → view, create, update, delete
/// - finance       → view, record-offering, approve-expense
/// - events        → view, manage
/// - announcements → send (single permission)
/// - settings      → manage (single permission)
pub fn church_catalog() -> RolekitResult<PermissionCatalog> {
    PermissionCatalog::new(vec![
        PermissionGroup::new(
            MEMBERS,
            "Member Records",
            "Directory of members and visitors",
            &[
                ("members.view", "View members"),
                ("members.create", "Register members"),
                ("members.update", "Edit member details"),
                ("members.delete", "Remove members"),
            ],
        ),
        PermissionGroup::new(
            FINANCE,
            "Finance",
            "Offerings, tithes, and expenses",
            &[
                ("finance.view", "View ledgers"),
                ("finance.record-offering", "Record offerings"),
                ("finance.approve-expense", "Approve expenses"),
            ],
        ),
        PermissionGroup::new(
            EVENTS,
            "Events",
            "Services, programs, and attendance",
            &[("events.view", "View events"), ("events.manage", "Manage events")],
        ),
        PermissionGroup::new(
            ANNOUNCEMENTS,
            "Announcements",
            "Bulk messages to the congregation",
            &[("announcements.send", "Send announcements")],
        ),
        PermissionGroup::new(
            SETTINGS,
            "Church Settings",
            "Branches, departments, and units",
            &[("settings.manage", "Manage settings")],
        ),
    ])
}

pub fn group(id: &str) -> GroupId {
    GroupId::new(id)
}

pub fn permission(id: &str) -> PermissionId {
    PermissionId::new(id)
}

/// A role written before the SMS gateway group was retired from the catalog.
pub fn legacy_secretary() -> RoleRecord {
    let members = GroupRef {
        id: group(MEMBERS),
        name: "Member Records".to_string(),
    };
    let sms = GroupRef {
        id: group("sms-gateway"),
        name: "SMS Gateway".to_string(),
    };
    RoleRecord {
        id: RoleId::new("role-secretary"),
        name: "Branch Secretary".to_string(),
        description: "Keeps the branch register".to_string(),
        scope_level: ScopeLevel::Branch,
        permission_groups: vec![members.clone(), sms.clone()],
        permissions: vec![
            PermissionRef {
                id: permission("members.view"),
                name: "View members".to_string(),
                group: members.clone(),
            },
            PermissionRef {
                id: permission("members.update"),
                name: "Edit member details".to_string(),
                group: members,
            },
            PermissionRef {
                id: permission("sms.send"),
                name: "Send SMS".to_string(),
                group: sms,
            },
        ],
    }
}

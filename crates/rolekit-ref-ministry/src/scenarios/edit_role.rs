//! Scenario 2: Edit existing roles
//!
//! Part A edits a role created in this run:
//!   1. The role is fetched and hydrated; Events renders fully checked
//!   2. The operator adds one Member Records permission and drops Events
//!   3. The update payload carries only what changed tiers need
//!
//! Part B edits a role written against an older catalog:
//!   1. Hydration carries the retired "sms-gateway" group and "sms.send" as orphans
//!   2. The projection still renders them, without crashing
//!   3. Toggling them off removes the orphan ids before saving
//!
//! Saving without the cleanup also works; the directory keeps the retired
//! group as a zero-permission group.

use std::sync::Arc;

use rolekit_contracts::{
    error::RolekitResult,
    role::{RoleDraft, RoleId, RolePayload, RoleRecord, ScopeLevel, SelectionPayload},
};
use rolekit_core::{traits::RoleDirectory, EditingSession};
use rolekit_directory::{InMemoryCatalog, InMemoryRoleDirectory, UpdateSemantics};

use crate::mock_data::{group, legacy_secretary, permission, EVENTS, MEMBERS};
use crate::render::{print_groups, print_payload, print_report};
use crate::scenarios::{backends, engine_config};

/// Persist the Youth Leader role the edit starts from: all of Events plus
/// viewing members.
pub fn seed_youth_leader(directory: &InMemoryRoleDirectory) -> RolekitResult<RoleRecord> {
    directory.create_role(&RolePayload {
        name: "Youth Leader".to_string(),
        description: "Runs the youth fellowship".to_string(),
        scope_level: ScopeLevel::Department,
        selection: SelectionPayload {
            permission_group: Some(vec![group(MEMBERS), group(EVENTS)]),
            permissions: Some(vec![permission("members.view")]),
        },
    })
}

/// Open an edit session on `role_id`.
pub fn open_edit(
    role_id: &RoleId,
    source: &InMemoryCatalog,
    directory: &Arc<InMemoryRoleDirectory>,
) -> RolekitResult<EditingSession> {
    Ok(EditingSession::open_edit(
        role_id.clone(),
        engine_config()?,
        Box::new(source.clone()),
        Box::new(Arc::clone(directory)),
    ))
}

fn draft_from(record: &RoleRecord) -> RoleDraft {
    RoleDraft {
        name: record.name.clone(),
        description: record.description.clone(),
        scope_level: record.scope_level,
    }
}

/// Part A edit: grant member updates, withdraw Events.
pub fn edit_youth_leader(session: &mut EditingSession) -> RolekitResult<()> {
    session.toggle_permission(&permission("members.update"), true)?;
    session.toggle_group(&group(EVENTS), false)
}

/// Part B edit: clear the orphans carried over from the retired group.
pub fn tidy_secretary(session: &mut EditingSession) -> RolekitResult<()> {
    session.toggle_group(&group("sms-gateway"), false)?;
    session.toggle_permission(&permission("sms.send"), false)
}

/// Run Scenario 2: Edit existing roles.
pub fn run_scenario() -> RolekitResult<()> {
    println!("=== Scenario 2: Edit existing roles ===");
    println!();

    let (source, directory) = backends(UpdateSemantics::Replace)?;

    // ── Part A ────────────────────────────────────────────────────────────────

    let youth = seed_youth_leader(&directory)?;
    let mut session = open_edit(&youth.id, &source, &directory)?;

    println!("  Part A: '{}' as hydrated:", youth.name);
    print_groups(&session.groups()?);
    println!();

    edit_youth_leader(&mut session)?;
    let preview = session.preview()?;
    print_payload(&preview.payload);
    print_report(&preview.report);

    let updated = session.submit(draft_from(&youth))?;
    println!(
        "  Effective permissions:  {}",
        updated
            .permissions
            .iter()
            .map(|p| p.id.0.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    // ── Part B ────────────────────────────────────────────────────────────────

    let legacy = legacy_secretary();
    directory.seed_role(legacy.clone())?;
    let mut session = open_edit(&legacy.id, &source, &directory)?;

    println!("  Part B: '{}' as hydrated:", legacy.name);
    print_groups(&session.groups()?);
    if let Some(report) = session.hydration() {
        println!(
            "  Orphans at hydration:   {} group(s), {} permission(s)",
            report.orphan_groups.len(),
            report.orphan_permissions.len()
        );
    }
    println!();

    tidy_secretary(&mut session)?;
    let preview = session.preview()?;
    print_payload(&preview.payload);
    print_report(&preview.report);
    session.submit(draft_from(&legacy))?;

    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use rolekit_selection::{Coverage, TriState};

    use super::*;

    #[test]
    fn youth_leader_hydrates_full_and_partial_groups() {
        let (source, directory) = backends(UpdateSemantics::Replace).unwrap();
        let youth = seed_youth_leader(&directory).unwrap();
        let session = open_edit(&youth.id, &source, &directory).unwrap();

        let views = session.groups().unwrap();
        let members = views.iter().find(|v| v.id == group(MEMBERS)).unwrap();
        let events = views.iter().find(|v| v.id == group(EVENTS)).unwrap();
        assert_eq!(members.display, TriState::Checked);
        assert_eq!(members.coverage, Coverage::Partial);
        assert_eq!(events.coverage, Coverage::Full);
    }

    #[test]
    fn youth_leader_edit_sends_partial_members_only() {
        let (source, directory) = backends(UpdateSemantics::Replace).unwrap();
        let youth = seed_youth_leader(&directory).unwrap();
        let mut session = open_edit(&youth.id, &source, &directory).unwrap();

        edit_youth_leader(&mut session).unwrap();
        let preview = session.preview().unwrap();
        assert_eq!(preview.payload.permission_group, Some(vec![group(MEMBERS)]));
        assert_eq!(
            preview.payload.permissions,
            Some(vec![permission("members.view"), permission("members.update")])
        );

        let updated = session.submit(draft_from(&youth)).unwrap();
        assert!(updated.permissions.iter().all(|p| p.group.id == group(MEMBERS)));
    }

    #[test]
    fn legacy_orphans_are_rendered_then_removed() {
        let (source, directory) = backends(UpdateSemantics::Replace).unwrap();
        let legacy = legacy_secretary();
        directory.seed_role(legacy.clone()).unwrap();
        let mut session = open_edit(&legacy.id, &source, &directory).unwrap();

        let orphan = session.groups().unwrap().into_iter().find(|v| v.orphan).unwrap();
        assert_eq!(orphan.id, group("sms-gateway"));

        let before = session.preview().unwrap();
        assert_eq!(before.report.dropped_permissions, vec![permission("sms.send")]);

        tidy_secretary(&mut session).unwrap();
        let after = session.preview().unwrap();
        assert!(after.report.is_clean());
        assert_eq!(after.payload.permission_group, Some(vec![group(MEMBERS)]));
    }

    #[test]
    fn untouched_legacy_role_saves_with_stale_group() {
        let (source, directory) = backends(UpdateSemantics::Replace).unwrap();
        let legacy = legacy_secretary();
        directory.seed_role(legacy.clone()).unwrap();
        let mut session = open_edit(&legacy.id, &source, &directory).unwrap();

        let renamed = RoleDraft {
            name: "Parish Secretary".to_string(),
            ..draft_from(&legacy)
        };
        let updated = session.submit(renamed).unwrap();

        assert_eq!(updated.name, "Parish Secretary");
        let stale = updated
            .permission_groups
            .iter()
            .find(|g| g.id == group("sms-gateway"))
            .unwrap();
        assert_eq!(stale.name, "SMS Gateway");
        assert!(!updated.permissions.is_empty());
        assert!(updated.permissions.iter().all(|p| p.group.id == group(MEMBERS)));
    }

    #[test]
    fn scenario_runs() {
        run_scenario().unwrap();
    }
}

//! Scenario 1: Create a Treasurer role
//!
//! Mixes both selection granularities in one role:
//!   1. Finance group turned on as a whole, then "approve expenses" unchecked
//!   2. A single Member Records permission checked (its group is opted in)
//!   3. The single-permission Announcements group turned on
//!   4. Payload: three group ids, explicit ids only for the partial groups
//!   5. The directory decodes the payload back into effective permissions

use std::sync::Arc;

use rolekit_contracts::{
    error::RolekitResult,
    role::{RoleDraft, RoleRecord, ScopeLevel},
};
use rolekit_core::EditingSession;
use rolekit_directory::{InMemoryCatalog, InMemoryRoleDirectory, UpdateSemantics};

use crate::mock_data::{group, permission, ANNOUNCEMENTS, FINANCE};
use crate::render::{print_groups, print_payload, print_report};
use crate::scenarios::{backends, engine_config};

/// Open a create session and apply the Treasurer selection.
pub fn compose_treasurer(
    source: &InMemoryCatalog,
    directory: &Arc<InMemoryRoleDirectory>,
) -> RolekitResult<EditingSession> {
    let mut session = EditingSession::open_create(
        engine_config()?,
        Box::new(source.clone()),
        Box::new(Arc::clone(directory)),
    );

    session.toggle_group(&group(FINANCE), true)?;
    session.toggle_permission(&permission("finance.approve-expense"), false)?;
    session.toggle_permission(&permission("members.view"), true)?;
    session.toggle_group(&group(ANNOUNCEMENTS), true)?;

    Ok(session)
}

pub fn treasurer_draft() -> RoleDraft {
    RoleDraft {
        name: "Treasurer".to_string(),
        description: "Records offerings for the whole church".to_string(),
        scope_level: ScopeLevel::Church,
    }
}

/// Run Scenario 1: Create a Treasurer role.
pub fn run_scenario() -> RolekitResult<()> {
    println!("=== Scenario 1: Create a Treasurer role ===");
    println!();

    let (source, directory) = backends(UpdateSemantics::Replace)?;
    let mut session = compose_treasurer(&source, &directory)?;

    println!("  Selection after toggles:");
    print_groups(&session.groups()?);
    println!();

    let preview = session.preview()?;
    print_payload(&preview.payload);
    print_report(&preview.report);

    let record: RoleRecord = session.submit(treasurer_draft())?;
    println!("  Stored role:            {} ({})", record.name, record.id);
    println!(
        "  Effective permissions:  {}",
        record
            .permissions
            .iter()
            .map(|p| p.id.0.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data::MEMBERS;

    #[test]
    fn treasurer_payload_is_two_tier() {
        let (source, directory) = backends(UpdateSemantics::Replace).unwrap();
        let session = compose_treasurer(&source, &directory).unwrap();

        let preview = session.preview().unwrap();
        assert_eq!(
            preview.payload.permission_group,
            Some(vec![group(MEMBERS), group(FINANCE), group(ANNOUNCEMENTS)])
        );
        assert_eq!(
            preview.payload.permissions,
            Some(vec![
                permission("members.view"),
                permission("finance.view"),
                permission("finance.record-offering"),
            ])
        );
        assert!(preview.report.is_clean());
    }

    #[test]
    fn treasurer_round_trips_through_directory() {
        let (source, directory) = backends(UpdateSemantics::Replace).unwrap();
        let mut session = compose_treasurer(&source, &directory).unwrap();
        let record = session.submit(treasurer_draft()).unwrap();

        let ids: Vec<&str> = record.permissions.iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "members.view",
                "finance.view",
                "finance.record-offering",
                "announcements.send",
            ]
        );
    }

    #[test]
    fn scenario_runs() {
        run_scenario().unwrap();
    }
}

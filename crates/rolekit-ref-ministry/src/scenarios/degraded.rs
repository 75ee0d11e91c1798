//! Scenario 4: Degraded fetches
//!
//! Part A: the catalog is down when a create session opens. Group toggles
//!   render empty, submission is refused, and a retry recovers.
//! Part B: the role directory is down when an edit session opens. The
//!   selection starts empty, which would wipe the role, so submission is
//!   refused with a retryable notice until the role is re-fetched.

use std::sync::Arc;

use rolekit_contracts::{
    error::{RolekitError, RolekitResult},
    role::{RoleDraft, ScopeLevel},
};
use rolekit_core::{EditingSession, NoticeBoard};
use rolekit_directory::UpdateSemantics;

use crate::mock_data::{group, SETTINGS};
use crate::scenarios::{backends, edit_role, engine_config};

fn print_notices(board: &NoticeBoard) {
    for notice in board.active() {
        println!(
            "  Notice [{:?}{}]: {}",
            notice.level,
            if notice.retryable { ", retryable" } else { "" },
            notice.message
        );
    }
}

fn describe(result: RolekitResult<impl Sized>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(e) => e.to_string(),
    }
}

/// Run Scenario 4: Degraded fetches.
pub fn run_scenario() -> RolekitResult<()> {
    println!("=== Scenario 4: Degraded fetches ===");
    println!();

    let (source, directory) = backends(UpdateSemantics::Replace)?;
    let draft = RoleDraft {
        name: "Administrator".to_string(),
        description: String::new(),
        scope_level: ScopeLevel::Church,
    };

    // ── Part A: catalog outage ────────────────────────────────────────────────

    println!("  Part A: permission catalog unavailable");
    source.fail_with("catalog service timed out")?;
    let mut session = EditingSession::open_create(
        engine_config()?,
        Box::new(source.clone()),
        Box::new(Arc::clone(&directory)),
    );
    print_notices(session.notices());
    println!("  Groups rendered:        {}", session.groups()?.len());
    println!(
        "  Toggle settings:        {}",
        describe(session.toggle_group(&group(SETTINGS), true))
    );
    println!("  Submit:                 {}", describe(session.submit(draft.clone())));

    source.restore()?;
    session.retry_catalog()?;
    session.toggle_group(&group(SETTINGS), true)?;
    let created = session.submit(draft)?;
    println!("  After retry:            saved '{}' ({})", created.name, created.id);
    println!();

    // ── Part B: role directory outage ─────────────────────────────────────────

    println!("  Part B: role directory unavailable while opening an edit");
    let youth = edit_role::seed_youth_leader(&directory)?;
    directory.fail_with("directory connection reset")?;
    let mut session = edit_role::open_edit(&youth.id, &source, &directory)?;
    print_notices(session.notices());

    let empty = session.state().map(|s| s.is_empty()).unwrap_or(true);
    println!("  Selection empty:        {}", empty);
    let blocked = session.submit(RoleDraft {
        name: youth.name.clone(),
        description: youth.description.clone(),
        scope_level: youth.scope_level,
    });
    match &blocked {
        Err(RolekitError::SubmissionBlocked { reason }) => {
            println!("  Submit:                 blocked ({})", reason)
        }
        other => println!("  Submit:                 unexpected {:?}", other),
    }

    directory.restore()?;
    session.retry_role()?;
    let checked = session.state().map(|s| s.checked_permissions.len()).unwrap_or(0);
    println!("  After retry:            {} permission(s) hydrated", checked);

    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

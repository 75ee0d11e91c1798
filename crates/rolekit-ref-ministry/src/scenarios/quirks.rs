//! Scenario 3: Selection anomalies
//!
//! The two independent selection sets can disagree. Neither anomaly is
//! resolved silently; both are reported, and the engine config can turn
//! either into a hard error.
//!
//! Part A: a selected group with every permission unchecked is still sent
//!   as a group id with no explicit permissions. The reference directory
//!   reads that as "whole group", so the operator's intent is inverted.
//! Part B: a checked permission whose group is not selected (only reachable
//!   by building the state by hand) is dropped from the payload.

use std::collections::BTreeSet;
use std::sync::Arc;

use rolekit_contracts::{
    catalog::PermissionCatalog,
    error::RolekitResult,
    role::{RolePayload, RoleRecord, ScopeLevel},
    selection::SelectionState,
};
use rolekit_core::traits::RoleDirectory;
use rolekit_directory::UpdateSemantics;
use rolekit_selection::{
    EmptyGroupPolicy, EngineConfig, SelectionStore, Serialization, Serializer, StrayPolicy,
};

use crate::mock_data::{church_catalog, group, permission, EVENTS};
use crate::render::{print_payload, print_report};
use crate::scenarios::{backends, engine_config};

/// Select Events, then uncheck everything inside it.
pub fn emptied_group(
    catalog: Arc<PermissionCatalog>,
    config: &EngineConfig,
) -> RolekitResult<SelectionStore> {
    let mut store = SelectionStore::new(catalog, config);
    store.toggle_group(&group(EVENTS), true)?;
    store.deselect_all_in_group(&group(EVENTS))?;
    Ok(store)
}

/// A state with a finance permission checked but no group selected.
pub fn stray_state() -> SelectionState {
    SelectionState {
        selected_groups: BTreeSet::new(),
        checked_permissions: [permission("finance.view")].into_iter().collect(),
    }
}

fn serialize(store: &SelectionStore, config: &EngineConfig) -> RolekitResult<Serialization> {
    Serializer::new(config.clone()).serialize(store.catalog(), store.state())
}

/// Send the emptied Events selection to a directory and read back what it granted.
pub fn save_emptied_group(config: &EngineConfig) -> RolekitResult<RoleRecord> {
    let (source, directory) = backends(UpdateSemantics::Replace)?;
    let store = emptied_group(source.catalog(), config)?;
    let Serialization { payload, .. } = serialize(&store, config)?;

    directory.create_role(&RolePayload {
        name: "Greeter".to_string(),
        description: String::new(),
        scope_level: ScopeLevel::Unit,
        selection: payload,
    })
}

/// Run Scenario 3: Selection anomalies.
pub fn run_scenario() -> RolekitResult<()> {
    println!("=== Scenario 3: Selection anomalies ===");
    println!();

    let config = engine_config()?;
    let catalog = Arc::new(church_catalog()?);

    // ── Part A: selected group, nothing checked ───────────────────────────────

    println!("  Part A: Events selected, every permission unchecked");
    let store = emptied_group(Arc::clone(&catalog), &config)?;
    let out = serialize(&store, &config)?;
    print_payload(&out.payload);
    print_report(&out.report);

    let saved = save_emptied_group(&config)?;
    println!(
        "  Directory granted:      {} permission(s) from the emptied group",
        saved.permissions.len()
    );

    let strict = EngineConfig {
        empty_groups: EmptyGroupPolicy::Reject,
        ..config.clone()
    };
    match serialize(&store, &strict) {
        Ok(_) => println!("  Strict config:          accepted"),
        Err(e) => println!("  Strict config:          {}", e),
    }
    println!();

    // ── Part B: checked permission, group not selected ────────────────────────

    println!("  Part B: finance.view checked, Finance not selected");
    let store = SelectionStore::with_state(Arc::clone(&catalog), stray_state(), &config);
    let out = serialize(&store, &config)?;
    print_payload(&out.payload);
    print_report(&out.report);

    let strict = EngineConfig {
        stray_permissions: StrayPolicy::Reject,
        ..config
    };
    match serialize(&store, &strict) {
        Ok(_) => println!("  Strict config:          accepted"),
        Err(e) => println!("  Strict config:          {}", e),
    }

    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

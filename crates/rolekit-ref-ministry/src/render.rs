//! Console rendering shared by the scenarios.

use rolekit_contracts::role::SelectionPayload;
use rolekit_selection::{GroupView, SerializationReport, TriState};

/// Print one line per group, then its permissions.
pub fn print_groups(views: &[GroupView]) {
    for view in views {
        let mark = match view.display {
            TriState::Checked => "[x]",
            TriState::Indeterminate => "[-]",
            TriState::Unchecked => "[ ]",
        };
        let suffix = if view.orphan { "  (no longer in catalog)" } else { "" };
        println!(
            "    {} {:<18} {}/{} {:?}{}",
            mark, view.name, view.checked_count, view.total_count, view.coverage, suffix
        );
        for p in &view.permissions {
            println!("          {} {}", if p.checked { "x" } else { "." }, p.id);
        }
    }
}

/// Print the payload as the JSON the directory would receive.
pub fn print_payload(payload: &SelectionPayload) {
    let json = serde_json::to_string(payload).unwrap_or_else(|e| format!("<unprintable: {}>", e));
    println!("  Payload:                {}", json);
}

pub fn print_report(report: &SerializationReport) {
    if report.is_clean() {
        println!("  Serialization report:   clean");
        return;
    }
    let ids = |v: Vec<String>| if v.is_empty() { "-".to_string() } else { v.join(", ") };
    println!(
        "  Empty groups:           {}",
        ids(report.empty_groups.iter().map(|g| g.0.clone()).collect())
    );
    println!(
        "  Orphan groups:          {}",
        ids(report.orphan_groups.iter().map(|g| g.0.clone()).collect())
    );
    println!(
        "  Dropped permissions:    {}",
        ids(report.dropped_permissions.iter().map(|p| p.0.clone()).collect())
    );
}

//! Church administration reference scenarios.
//!
//! Each scenario wires real rolekit components (catalog source, role
//! directory, editing session, serializer) to the mock catalog and walks one
//! composition pattern end to end.

pub mod create_role;
pub mod degraded;
pub mod edit_role;
pub mod quirks;

use std::sync::Arc;

use rolekit_contracts::error::RolekitResult;
use rolekit_directory::{InMemoryCatalog, InMemoryRoleDirectory, UpdateSemantics};
use rolekit_selection::EngineConfig;

use crate::mock_data::church_catalog;

/// Engine configuration shared by the scenarios.
const SELECTION_CONFIG: &str = include_str!("../../config/selection.toml");

pub fn engine_config() -> RolekitResult<EngineConfig> {
    EngineConfig::from_toml_str(SELECTION_CONFIG)
}

/// A fresh catalog source and an empty directory over the church catalog.
pub fn backends(semantics: UpdateSemantics) -> RolekitResult<(InMemoryCatalog, Arc<InMemoryRoleDirectory>)> {
    let source = InMemoryCatalog::new(church_catalog()?);
    let directory = Arc::new(InMemoryRoleDirectory::new(source.catalog(), semantics));
    Ok((source, directory))
}

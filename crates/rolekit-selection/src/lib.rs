//! # rolekit-selection
//!
//! The role permission composition engine.
//!
//! ## Overview
//!
//! An operator composes a role by selecting whole permission groups and/or
//! individual permissions. This crate keeps the two selection granularities
//! consistent and turns the result into the minimal update payload:
//!
//! - [`SelectionStore`] holds the state and applies the four toggles.
//! - [`project`] derives the tri-state view of every group.
//! - [`hydrate_role`] seeds a store from a persisted role (edit mode).
//! - [`Serializer`] produces the two-tier payload: group ids, plus explicit
//!   permission ids only for partially covered groups.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rolekit_selection::{EngineConfig, SelectionStore, Serializer};
//!
//! let config = EngineConfig::default();
//! let mut store = SelectionStore::new(Arc::new(catalog), &config);
//! store.toggle_group(&GroupId::new("members"), true)?;
//! let out = Serializer::new(config).serialize(store.catalog(), store.state())?;
//! ```

pub mod config;
pub mod hydrator;
pub mod projection;
pub mod serializer;
pub mod store;

pub use config::{EmptyGroupPolicy, EngineConfig, StrayPolicy};
pub use hydrator::{hydrate_ids, hydrate_role, HydrationReport};
pub use projection::{project, Coverage, GroupView, PermissionView, TriState};
pub use serializer::{Serialization, SerializationReport, Serializer};
pub use store::{checked_in_group, is_fully_checked, is_partially_checked, SelectionStore};

// ── Tests ─────────────────────────────────────────────────────────────────────

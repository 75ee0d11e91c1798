//! # rolekit-core
//!
//! The role editing session for rolekit.
//!
//! This crate provides:
//! - The two collaborator traits (`CatalogSource`, `RoleDirectory`)
//! - The `EditingSession` that drives fetch, hydration, toggles, and submit
//! - The session-scoped `NoticeBoard`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rolekit_core::{EditingSession, traits::{CatalogSource, RoleDirectory}};
//! ```

pub mod notice;
pub mod session;
pub mod traits;

pub use notice::NoticeBoard;
pub use session::{EditingSession, RoleLoad, SessionMode};

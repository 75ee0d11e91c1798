//! # rolekit-contracts
//!
//! Shared types, wire formats, and contracts for the rolekit role composition
//! engine.
//!
//! Every crate in the workspace imports from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod catalog;
pub mod error;
pub mod notice;
pub mod role;
pub mod selection;

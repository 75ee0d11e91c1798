//! # rolekit-ref-ministry
//!
//! Church administration reference runtime for the rolekit role composition
//! engine.
//!
//! Demonstrates four scenarios against a mock catalog and an in-memory role
//! directory:
//!
//! 1. **Create** — whole groups, single permissions, and the two-tier payload.
//! 2. **Edit** — hydration from a stored role, including orphan ids left by a
//!    retired group.
//! 3. **Anomalies** — the empty selected group and the dropped stray
//!    permission, under lenient and strict engine configs.
//! 4. **Degraded fetches** — catalog and role outages, retryable notices, and
//!    blocked submission.
//!
//! All data is hardcoded and fictional.

pub mod mock_data;
pub mod render;
pub mod scenarios;

//! Error types for the rolekit composition engine and its editing session.
//!
//! All fallible operations return `RolekitResult<T>`. Variants carry the ids
//! involved so a caller can raise a precise notice without re-deriving state.

use thiserror::Error;

/// The unified error type for rolekit.
#[derive(Debug, Error)]
pub enum RolekitError {
    /// A group id is neither in the catalog nor carried as a hydrated orphan.
    #[error("permission group '{group_id}' is not present in the catalog")]
    UnknownGroup { group_id: String },

    /// A permission id is neither in the catalog nor carried as a hydrated orphan.
    #[error("permission '{permission_id}' is not present in the catalog")]
    UnknownPermission { permission_id: String },

    /// The catalog itself is malformed (duplicate ids, empty groups).
    #[error("invalid permission catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// The permission catalog could not be fetched for this session.
    #[error("permission catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// The role being edited could not be fetched.
    ///
    /// Distinct from a role that legitimately has no grants.
    #[error("role '{role_id}' could not be loaded: {reason}")]
    RoleUnavailable { role_id: String, reason: String },

    /// Submission is refused locally until a failed fetch is retried.
    #[error("submission blocked: {reason}")]
    SubmissionBlocked { reason: String },

    /// The selection cannot be acted on as requested.
    #[error("inconsistent selection: {reason}")]
    InconsistentSelection { reason: String },

    /// The role form fields failed validation.
    #[error("invalid role: {reason}")]
    InvalidRole { reason: String },

    /// The role directory has no role with this id.
    #[error("role '{role_id}' not found")]
    RoleNotFound { role_id: String },

    /// The role directory rejected or failed a request.
    #[error("role directory request failed: {reason}")]
    DirectoryFailed { reason: String },

    /// The editing session was closed; its state has been discarded.
    #[error("editing session is closed")]
    SessionClosed,

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the rolekit crates.
pub type RolekitResult<T> = Result<T, RolekitError>;

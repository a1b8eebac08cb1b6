//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RoboHubError`] via `#[from]`. Adapters wrap their backend errors in
//! [`RoboHubError::Storage`] so the domain never names an IO crate.

/// Top-level error for all domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum RoboHubError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced aggregate does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A concurrent update lost the race (e.g. two callers promoting
    /// different default robots for the same permission group).
    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// An adapter-level failure (database, serialization, …).
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An aggregate requires a non-empty name.
    #[error("name must not be empty")]
    EmptyName,

    /// An automation rule requires at least one action.
    #[error("rule must have at least one action")]
    NoActions,

    /// A time window hour is outside `0..=23`.
    #[error("hour {0} is outside 0..=23")]
    HourOutOfRange(u8),

    /// A string could not be parsed as the expected value.
    #[error("invalid {field}: {value}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of aggregate, e.g. `"Robot"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

/// A serialized update conflicted with a concurrent one.
#[derive(Debug, thiserror::Error)]
#[error("conflicting update on {entity} {id}")]
pub struct ConflictError {
    /// Kind of aggregate, e.g. `"Robot"`.
    pub entity: &'static str,
    /// The identifier that was contended.
    pub id: String,
}

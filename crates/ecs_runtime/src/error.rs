//! Error types for entity, component and scheduler operations.

use std::convert::Infallible;

use crate::entity::Entity;

/// Errors raised by the [`World`](crate::World), the
/// [`Scheduler`](crate::Scheduler) and the
/// [`EntityManager`](crate::EntityManager).
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// The entity is not registered (never created, or already deleted).
    #[error("{0} not found")]
    NotFound(Entity),

    /// Nothing runnable could be resolved for a system registration.
    #[error("invalid system: {0}")]
    InvalidSystem(String),

    /// A system ordering key is not an integer.
    #[error("invalid system order: {0}")]
    InvalidOrder(String),

    /// A system's handle was already borrowed when the frame reached it.
    #[error("system '{0}' is already borrowed")]
    SystemBusy(String),

    /// A system's update failed; the rest of the frame was skipped.
    #[error("system '{name}' failed")]
    SystemFailed {
        /// Name of the failing system.
        name: String,
        /// The error returned by the system.
        #[source]
        source: anyhow::Error,
    },

    /// A schedule document could not be parsed.
    #[error("invalid schedule config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<Infallible> for EcsError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

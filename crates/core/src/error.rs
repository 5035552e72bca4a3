//! Domain-level error type shared across the workspace.

use crate::types::DbId;

/// Errors produced by pure domain logic.
///
/// Network-layer errors live in `whisprtales-api`; this type covers the
/// checks that run *before* any request is issued (preconditions,
/// validation) plus generic internal failures.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist client-side.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"scene"` or `"story"`.
        entity: &'static str,
        /// The id that failed to resolve.
        id: DbId,
    },

    /// A precondition or input check failed. The message is suitable for
    /// direct display to the user.
    #[error("{0}")]
    Validation(String),

    /// The user's credit balance does not cover the estimated cost.
    #[error("Insufficient credits: {required:.2} required, {available:.2} available")]
    InsufficientCredits {
        /// Estimated cost of the requested action.
        required: f64,
        /// Last known balance.
        available: f64,
    },

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

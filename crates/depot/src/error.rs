//! Error types for depot operations.

use thiserror::Error;

/// Errors returned by the mission coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepotError {
    /// Initialization parameters out of range
    #[error("{0}")]
    Validation(String),

    /// Another assignment currently holds the coordination token
    #[error("Another client is currently performing planning.")]
    PlanningInProgress,

    /// Unassigned pool is empty
    #[error("No available tram.")]
    NoAvailableTram,

    /// Roster and unassigned pool disagree
    #[error("Depot invariant violated: {0}")]
    InvariantViolation(String),
}

/// Coarse classification used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; retrying with the same input fails again
    Validation,
    /// Token contention; retry later
    Conflict,
    /// Nothing left to assign until the depot is re-initialized
    Exhaustion,
    /// Internal fault
    Internal,
}

impl DepotError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DepotError::Validation(_) => ErrorKind::Validation,
            DepotError::PlanningInProgress => ErrorKind::Conflict,
            DepotError::NoAvailableTram => ErrorKind::Exhaustion,
            DepotError::InvariantViolation(_) => ErrorKind::Internal,
        }
    }

    /// Check if the same call may succeed later without re-initializing
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

/// Result type for depot operations.
pub type DepotResult<T> = Result<T, DepotError>;

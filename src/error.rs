//! Error types for the foreman coordinator.

/// Errors surfaced by the coordinator's operations.
///
/// Display strings double as the wire-level `error` messages returned to
/// workers, so they stay short and actionable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    /// Validation: the caller supplied no worker identifier.
    #[error("worker_id is required")]
    MissingWorkerId,

    /// Conflict: the identifier is already taken.
    #[error("worker_id already registered, please use a different worker_id")]
    DuplicateWorker,

    /// Conflict: the worker already holds an outstanding chunk.
    #[error("worker already has a task assigned")]
    AlreadyAssigned,

    /// State: the worker never registered.
    #[error("worker_id not registered")]
    UnknownWorker,

    /// State: the worker holds nothing to submit.
    #[error("no task assigned to worker")]
    NoActiveAssignment,

    /// Validation: batch ingestion received no items.
    #[error("task_content is required")]
    EmptyTaskContent,
}

/// Telemetry publish errors. Always logged and swallowed by the
/// coordinator, never propagated to an operation's caller.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Sink {name} rejected snapshot: {reason}")]
    Rejected { name: String, reason: String },
}

/// Result type alias for coordinator operations.
pub type Result<T> = std::result::Result<T, CoordinatorError>;

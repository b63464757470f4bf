//! Worker records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::ChunkId;

/// Client-chosen worker identifier. Unique within a run.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One registered worker process.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerRecord {
    pub worker_id: WorkerId,
    /// Accumulated reward. Monotonically non-decreasing.
    pub reward: f64,
    /// The single chunk this worker currently holds, if any.
    pub assigned_chunk: Option<ChunkId>,
    /// Completed chunk indices, append-only.
    pub done_chunks: Vec<ChunkId>,
    pub last_update_time: DateTime<Utc>,
}

impl WorkerRecord {
    pub fn new(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            reward: 0.0,
            assigned_chunk: None,
            done_chunks: Vec::new(),
            last_update_time: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_worker_is_idle_with_zero_reward() {
        let worker = WorkerRecord::new(WorkerId::from("w1"));
        assert_eq!(worker.reward, 0.0);
        assert!(worker.assigned_chunk.is_none());
        assert!(worker.done_chunks.is_empty());
    }

    #[test]
    fn worker_id_serializes_as_bare_string() {
        let id = WorkerId::from("w1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"w1\"");
    }
}

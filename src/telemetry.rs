//! State snapshots pushed to a telemetry sink after every mutation.

use async_trait::async_trait;
use serde::Serialize;

use crate::coordinator::{ChunkRecord, WorkerRecord};
use crate::error::TelemetryError;

/// Scalar summary of the registries.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub task_num: usize,
    pub done_task_num: usize,
    pub worker_num: usize,
    /// Chunks with at least one outstanding assignment.
    pub assigned_task_num: usize,
    /// Mean of recorded time costs, or -1.0 when no sample exists yet.
    pub average_time_cost: f64,
    /// Chunks currently held by more than one worker.
    pub over_assigned_task_num: usize,
}

/// A full read of registry state: summary plus fully ranked tables.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub summary: SummaryStats,
    pub task_status: Vec<ChunkRecord>,
    pub worker_status: Vec<WorkerRecord>,
}

/// Destination for snapshots. The coordinator swallows publish failures
/// after logging them; an implementation never needs to retry.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    fn name(&self) -> &str;

    async fn publish(&self, snapshot: &Snapshot) -> Result<(), TelemetryError>;
}

/// Default sink: emits the scalar summary as a structured log event.
pub struct LogSink;

#[async_trait]
impl TelemetrySink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn publish(&self, snapshot: &Snapshot) -> Result<(), TelemetryError> {
        tracing::info!(
            task_num = snapshot.summary.task_num,
            done_task_num = snapshot.summary.done_task_num,
            worker_num = snapshot.summary.worker_num,
            assigned_task_num = snapshot.summary.assigned_task_num,
            average_time_cost = snapshot.summary.average_time_cost,
            over_assigned_task_num = snapshot.summary.over_assigned_task_num,
            "Telemetry snapshot"
        );
        Ok(())
    }
}

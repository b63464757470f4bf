//! The coordinator: lock-guarded registries and operation-shaped mutations.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{CoordinatorError, Result};
use crate::telemetry::{Snapshot, SummaryStats, TelemetrySink};

use super::ranking::{rank_chunks, rank_workers};
use super::reward::{RewardInputs, RewardPolicy, reward_increment};
use super::task::{ChunkId, ChunkRecord, partition};
use super::worker::{WorkerId, WorkerRecord};

/// Outcome of an `assign` call that did not fail validation.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignOutcome {
    /// A chunk was handed to the worker.
    Assigned { idx: ChunkId, content: Vec<u64> },
    /// The registry holds no chunks at all.
    NoTasks,
    /// Every chunk has been completed at least once.
    AllDone,
}

#[derive(Debug, Default)]
struct Registry {
    chunks: BTreeMap<ChunkId, ChunkRecord>,
    workers: BTreeMap<WorkerId, WorkerRecord>,
}

/// Owns both registries behind a single lock.
///
/// Every mutating operation takes the write guard across validation,
/// ranking, the mutation, and the telemetry publish, so no two
/// mutations interleave and each is all-or-nothing. Telemetry failures
/// are logged and swallowed; they never fail the operation.
pub struct Coordinator {
    registry: RwLock<Registry>,
    policy: RewardPolicy,
    sink: Arc<dyn TelemetrySink>,
}

impl Coordinator {
    /// Partition the workload and build the coordinator.
    ///
    /// Panics if the partitioner cannot cover `[0, total_items)` exactly
    /// (fatal startup condition).
    pub fn new(
        total_items: u64,
        chunk_size: u64,
        policy: RewardPolicy,
        sink: Arc<dyn TelemetrySink>,
    ) -> Arc<Self> {
        let chunks = partition(total_items, chunk_size);
        info!(chunks = chunks.len(), total_items, chunk_size, "Workload partitioned");
        Arc::new(Self {
            registry: RwLock::new(Registry {
                chunks: chunks.into_iter().map(|c| (c.idx, c)).collect(),
                workers: BTreeMap::new(),
            }),
            policy,
            sink,
        })
    }

    /// Build a coordinator with no chunks. Deployments that ingest their
    /// workload through `add_chunks` start here.
    pub fn empty(policy: RewardPolicy, sink: Arc<dyn TelemetrySink>) -> Arc<Self> {
        Arc::new(Self {
            registry: RwLock::new(Registry::default()),
            policy,
            sink,
        })
    }

    /// Register a new worker.
    pub async fn register(&self, worker_id: &str) -> Result<()> {
        if worker_id.is_empty() {
            return Err(CoordinatorError::MissingWorkerId);
        }
        let mut registry = self.registry.write().await;

        let worker_id = WorkerId::from(worker_id);
        if registry.workers.contains_key(&worker_id) {
            return Err(CoordinatorError::DuplicateWorker);
        }

        info!(worker_id = %worker_id, "Worker registered");
        registry
            .workers
            .insert(worker_id.clone(), WorkerRecord::new(worker_id));

        self.publish(&registry).await;
        Ok(())
    }

    /// Hand the rank-minimum chunk to an idle worker.
    ///
    /// The same chunk can legitimately be the minimum for two
    /// back-to-back calls, producing deliberate over-assignment to cover
    /// stragglers; the duplicate submission is paid at the policy's
    /// reduced rate rather than rejected.
    pub async fn assign(&self, worker_id: &str) -> Result<AssignOutcome> {
        if worker_id.is_empty() {
            return Err(CoordinatorError::MissingWorkerId);
        }
        let mut registry = self.registry.write().await;

        let worker_id = WorkerId::from(worker_id);
        let worker = registry
            .workers
            .get(&worker_id)
            .ok_or(CoordinatorError::UnknownWorker)?;
        if worker.assigned_chunk.is_some() {
            return Err(CoordinatorError::AlreadyAssigned);
        }

        // Full re-sort per call; fine at the modeled scale.
        let ranked = rank_chunks(registry.chunks.values().cloned().collect());
        let Some(head) = ranked.into_iter().next() else {
            return Ok(AssignOutcome::NoTasks);
        };
        if head.done_flag {
            return Ok(AssignOutcome::AllDone);
        }

        let idx = head.idx;
        let content = head.content;
        let now = Utc::now();

        if let Some(chunk) = registry.chunks.get_mut(&idx) {
            chunk.assign_num += 1;
            chunk.assigned_workers.push(worker_id.clone());
            chunk.last_update_time = Some(now);
        }
        if let Some(worker) = registry.workers.get_mut(&worker_id) {
            worker.assigned_chunk = Some(idx);
            worker.last_update_time = now;
        }

        info!(worker_id = %worker_id, chunk = %idx, "Chunk assigned");
        self.publish(&registry).await;
        Ok(AssignOutcome::Assigned { idx, content })
    }

    /// Accept a completed chunk from the worker that holds it.
    pub async fn submit(&self, worker_id: &str) -> Result<()> {
        if worker_id.is_empty() {
            return Err(CoordinatorError::MissingWorkerId);
        }
        let mut registry = self.registry.write().await;

        let worker_id = WorkerId::from(worker_id);
        let worker = registry
            .workers
            .get(&worker_id)
            .ok_or(CoordinatorError::UnknownWorker)?;
        let Some(idx) = worker.assigned_chunk else {
            return Err(CoordinatorError::NoActiveAssignment);
        };

        // Snapshots for the reward engine, captured before any mutation.
        let total_chunks = registry.chunks.len();
        let total_done_chunks = registry.chunks.values().filter(|c| c.done_flag).count();
        let worker_done_count = worker.done_chunks.len();

        let now = Utc::now();
        let mut first_completion = false;
        if let Some(chunk) = registry.chunks.get_mut(&idx) {
            first_completion = !chunk.done_flag;
            chunk.done_flag = true;
            chunk.assign_num = chunk.assign_num.saturating_sub(1);
            chunk.assigned_workers.retain(|w| w != &worker_id);
            if first_completion {
                if let Some(assigned_at) = chunk.last_update_time {
                    let elapsed = (now - assigned_at).num_milliseconds().max(0) as f64 / 1000.0;
                    chunk.time_cost = Some(elapsed);
                }
            }
            chunk.last_update_time = Some(now);
        }

        let increment = reward_increment(
            self.policy,
            RewardInputs {
                first_completion,
                total_chunks,
                total_done_chunks,
                worker_done_count,
            },
        );
        if let Some(worker) = registry.workers.get_mut(&worker_id) {
            worker.reward += increment;
            worker.done_chunks.push(idx);
            worker.assigned_chunk = None;
            worker.last_update_time = now;
        }

        info!(
            worker_id = %worker_id,
            chunk = %idx,
            first_completion,
            reward = increment,
            "Chunk submitted"
        );
        self.publish(&registry).await;
        Ok(())
    }

    /// Append new chunks from caller-supplied item ids, optionally
    /// re-chunked into `chunk_size` batches. Returns the new ids.
    pub async fn add_chunks(
        &self,
        items: Vec<u64>,
        chunk_size: Option<usize>,
    ) -> Result<Vec<ChunkId>> {
        if items.is_empty() {
            return Err(CoordinatorError::EmptyTaskContent);
        }
        let mut registry = self.registry.write().await;

        let size = chunk_size.unwrap_or(items.len()).max(1);
        let mut next = registry
            .chunks
            .keys()
            .next_back()
            .map(|id| id.0 + 1)
            .unwrap_or(0);

        let mut added = Vec::new();
        for batch in items.chunks(size) {
            let id = ChunkId(next);
            next += 1;
            registry.chunks.insert(id, ChunkRecord::new(id, batch.to_vec()));
            added.push(id);
        }

        info!(chunks = added.len(), items = items.len(), "Chunks ingested");
        self.publish(&registry).await;
        Ok(added)
    }

    /// Administrative hook: mark every chunk done and release all
    /// outstanding assignments. Returns how many chunks flipped.
    pub async fn finish_all(&self) -> usize {
        let mut registry = self.registry.write().await;
        let now = Utc::now();

        let mut flipped = 0;
        for chunk in registry.chunks.values_mut() {
            if !chunk.done_flag {
                chunk.done_flag = true;
                flipped += 1;
            }
            chunk.assign_num = 0;
            chunk.assigned_workers.clear();
            chunk.last_update_time = Some(now);
        }
        for worker in registry.workers.values_mut() {
            if worker.assigned_chunk.take().is_some() {
                worker.last_update_time = now;
            }
        }

        info!(flipped, "All chunks force-finished");
        self.publish(&registry).await;
        flipped
    }

    /// Current state snapshot: scalar summary plus fully ranked tables.
    pub async fn snapshot(&self) -> Snapshot {
        let registry = self.registry.read().await;
        Self::build_snapshot(&registry)
    }

    fn build_snapshot(registry: &Registry) -> Snapshot {
        let tasks = rank_chunks(registry.chunks.values().cloned().collect());
        let workers = rank_workers(registry.workers.values().cloned().collect());

        let time_costs: Vec<f64> = tasks.iter().filter_map(|c| c.time_cost).collect();
        let average_time_cost = if time_costs.is_empty() {
            -1.0
        } else {
            time_costs.iter().sum::<f64>() / time_costs.len() as f64
        };

        Snapshot {
            summary: SummaryStats {
                task_num: tasks.len(),
                done_task_num: tasks.iter().filter(|c| c.done_flag).count(),
                worker_num: workers.len(),
                assigned_task_num: tasks.iter().filter(|c| c.assign_num > 0).count(),
                average_time_cost,
                over_assigned_task_num: tasks.iter().filter(|c| c.assign_num > 1).count(),
            },
            task_status: tasks,
            worker_status: workers,
        }
    }

    /// Publish under the held write guard; failures never propagate.
    async fn publish(&self, registry: &Registry) {
        let snapshot = Self::build_snapshot(registry);
        if let Err(e) = self.sink.publish(&snapshot).await {
            tracing::error!(sink = self.sink.name(), error = %e, "Failed to publish telemetry snapshot");
        }
    }
}

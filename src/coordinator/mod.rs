//! The coordinator core: partitioning, registries, ranking, rewards.

mod ranking;
mod registry;
mod reward;
mod task;
mod worker;

pub use ranking::{rank_chunks, rank_workers};
pub use registry::{AssignOutcome, Coordinator};
pub use reward::{RewardInputs, RewardPolicy, reward_increment};
pub use task::{ChunkId, ChunkRecord, partition};
pub use worker::{WorkerId, WorkerRecord};

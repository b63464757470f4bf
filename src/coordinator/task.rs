//! Chunk records and the startup partitioner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::worker::WorkerId;

/// Identity of a chunk. Indices are dense and assigned at creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChunkId(pub u64);

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One contiguous slice of the workload; the unit of assignment.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkRecord {
    pub idx: ChunkId,
    /// Item ids covered by this chunk. Immutable after creation.
    pub content: Vec<u64>,
    /// Monotonic: never reverts to false once set.
    pub done_flag: bool,
    /// Count of currently outstanding assignments.
    pub assign_num: u32,
    /// Workers currently holding this chunk.
    pub assigned_workers: Vec<WorkerId>,
    /// When this chunk was last mutated. `None` until first touched.
    pub last_update_time: Option<DateTime<Utc>>,
    /// Seconds from assignment to first completion. Set exactly once.
    pub time_cost: Option<f64>,
}

impl ChunkRecord {
    pub fn new(idx: ChunkId, content: Vec<u64>) -> Self {
        Self {
            idx,
            content,
            done_flag: false,
            assign_num: 0,
            assigned_workers: Vec::new(),
            last_update_time: None,
            time_cost: None,
        }
    }
}

/// Split the workload `[0, total_items)` into contiguous, disjoint,
/// ordered chunks of `chunk_size` items (the last may be shorter).
///
/// Panics if the inputs are non-positive or the slices fail to cover the
/// workload exactly. Both signal a partitioning defect, so
/// initialization must not proceed.
pub fn partition(total_items: u64, chunk_size: u64) -> Vec<ChunkRecord> {
    assert!(total_items > 0, "total_items must be positive");
    assert!(chunk_size > 0, "chunk_size must be positive");

    let chunk_count = total_items.div_ceil(chunk_size);
    let mut chunks = Vec::with_capacity(chunk_count as usize);
    for idx in 0..chunk_count {
        let start = idx * chunk_size;
        let end = ((idx + 1) * chunk_size).min(total_items);
        chunks.push(ChunkRecord::new(ChunkId(idx), (start..end).collect()));
    }

    let covered: u64 = chunks.iter().map(|c| c.content.len() as u64).sum();
    assert_eq!(covered, total_items, "partition does not cover the workload");

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_ten_items_in_fours() {
        let chunks = partition(10, 4);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].idx, ChunkId(0));
        assert_eq!(chunks[0].content, vec![0, 1, 2, 3]);
        assert_eq!(chunks[1].content, vec![4, 5, 6, 7]);
        assert_eq!(chunks[2].content, vec![8, 9]);
    }

    #[test]
    fn partition_exact_fit_has_no_short_tail() {
        let chunks = partition(12, 4);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.content.len() == 4));
    }

    #[test]
    fn partition_covers_workload_for_many_shapes() {
        for (n, c) in [(1, 1), (1, 10), (7, 3), (96, 96), (8192, 96), (100, 7)] {
            let chunks = partition(n, c);
            assert_eq!(chunks.len() as u64, n.div_ceil(c), "count for N={n} C={c}");

            let covered: u64 = chunks.iter().map(|ch| ch.content.len() as u64).sum();
            assert_eq!(covered, n, "coverage for N={n} C={c}");

            // Contiguous and disjoint: flattening yields 0..n in order.
            let flat: Vec<u64> = chunks.iter().flat_map(|ch| ch.content.clone()).collect();
            assert_eq!(flat, (0..n).collect::<Vec<_>>());

            // Every chunk at most C items; only the last may be shorter.
            for (i, ch) in chunks.iter().enumerate() {
                assert!(ch.content.len() as u64 <= c);
                if i + 1 < chunks.len() {
                    assert_eq!(ch.content.len() as u64, c);
                }
            }
        }
    }

    #[test]
    fn new_chunks_start_untouched() {
        let chunks = partition(10, 4);
        for chunk in &chunks {
            assert!(!chunk.done_flag);
            assert_eq!(chunk.assign_num, 0);
            assert!(chunk.assigned_workers.is_empty());
            assert!(chunk.last_update_time.is_none());
            assert!(chunk.time_cost.is_none());
        }
    }

    #[test]
    #[should_panic(expected = "total_items must be positive")]
    fn partition_rejects_zero_items() {
        partition(0, 4);
    }

    #[test]
    #[should_panic(expected = "chunk_size must be positive")]
    fn partition_rejects_zero_chunk_size() {
        partition(10, 0);
    }
}

//! Total orders over the chunk and worker tables.

use super::task::ChunkRecord;
use super::worker::WorkerRecord;

/// Assignment order, ascending: not-yet-done chunks first, then fewest
/// outstanding assignments, then least-recently-touched. A chunk that
/// was never touched sorts before any touched one (`None < Some`). The
/// sort is stable, so ties fall back to registry order.
pub fn rank_chunks(mut chunks: Vec<ChunkRecord>) -> Vec<ChunkRecord> {
    chunks.sort_by_key(|c| (c.done_flag, c.assign_num, c.last_update_time));
    chunks
}

/// Reporting order: highest reward first, then most completions, then
/// most recent activity. Never consulted during assignment.
pub fn rank_workers(mut workers: Vec<WorkerRecord>) -> Vec<WorkerRecord> {
    workers.sort_by(|a, b| {
        b.reward
            .total_cmp(&a.reward)
            .then_with(|| b.done_chunks.len().cmp(&a.done_chunks.len()))
            .then_with(|| b.last_update_time.cmp(&a.last_update_time))
    });
    workers
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::coordinator::task::ChunkId;
    use crate::coordinator::worker::WorkerId;

    fn chunk(idx: u64) -> ChunkRecord {
        ChunkRecord::new(ChunkId(idx), vec![idx])
    }

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn undone_chunks_rank_before_done() {
        let mut done = chunk(0);
        done.done_flag = true;
        let ranked = rank_chunks(vec![done, chunk(1)]);
        assert_eq!(ranked[0].idx, ChunkId(1));
    }

    #[test]
    fn fewer_outstanding_assignments_rank_first() {
        let mut busy = chunk(0);
        busy.assign_num = 2;
        busy.last_update_time = Some(at(10));
        let mut calm = chunk(1);
        calm.assign_num = 1;
        calm.last_update_time = Some(at(20));
        let ranked = rank_chunks(vec![busy, calm]);
        assert_eq!(ranked[0].idx, ChunkId(1));
    }

    #[test]
    fn never_touched_ranks_before_any_touched() {
        let mut touched = chunk(0);
        touched.last_update_time = Some(at(1));
        let ranked = rank_chunks(vec![touched, chunk(1)]);
        assert_eq!(ranked[0].idx, ChunkId(1));
    }

    #[test]
    fn least_recently_touched_ranks_first() {
        let mut newer = chunk(0);
        newer.last_update_time = Some(at(100));
        let mut older = chunk(1);
        older.last_update_time = Some(at(50));
        let ranked = rank_chunks(vec![newer, older]);
        assert_eq!(ranked[0].idx, ChunkId(1));
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank_chunks(vec![chunk(3), chunk(1), chunk(2)]);
        let order: Vec<_> = ranked.iter().map(|c| c.idx).collect();
        assert_eq!(order, vec![ChunkId(3), ChunkId(1), ChunkId(2)]);
    }

    #[test]
    fn workers_rank_by_reward_then_completions_then_recency() {
        let mut rich = WorkerRecord::new(WorkerId::from("rich"));
        rich.reward = 5.0;
        rich.last_update_time = at(1);

        let mut diligent = WorkerRecord::new(WorkerId::from("diligent"));
        diligent.reward = 2.0;
        diligent.done_chunks = vec![ChunkId(0), ChunkId(1)];
        diligent.last_update_time = at(1);

        let mut recent = WorkerRecord::new(WorkerId::from("recent"));
        recent.reward = 2.0;
        recent.done_chunks = vec![ChunkId(2), ChunkId(3)];
        recent.last_update_time = at(99);

        let ranked = rank_workers(vec![diligent, recent, rich]);
        let order: Vec<_> = ranked.iter().map(|w| w.worker_id.as_str().to_string()).collect();
        assert_eq!(order, vec!["rich", "recent", "diligent"]);
    }
}

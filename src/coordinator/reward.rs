//! Reward increments for chunk submission.

use serde::{Deserialize, Serialize};

/// Duplicate-completion payout policy, chosen per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardPolicy {
    /// +1 for a first completion, +1e-6 for a duplicate.
    #[default]
    Flat,
    /// Duplicate payout scales with the share of chunks still
    /// outstanding plus the submitting worker's own completion count.
    Decaying,
}

impl RewardPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Some(Self::Flat),
            "decaying" => Some(Self::Decaying),
            _ => None,
        }
    }
}

/// Pre-update counts the engine needs. Callers capture these before the
/// submit mutates any record, which keeps the engine a pure function.
#[derive(Debug, Clone, Copy)]
pub struct RewardInputs {
    /// Whether this submission is the chunk's first completion.
    pub first_completion: bool,
    /// Chunks in the registry.
    pub total_chunks: usize,
    /// Chunks already completed at least once.
    pub total_done_chunks: usize,
    /// Chunks this worker had completed before this submission.
    pub worker_done_count: usize,
}

/// Reward increment for one submission.
pub fn reward_increment(policy: RewardPolicy, inputs: RewardInputs) -> f64 {
    if inputs.first_completion {
        return 1.0;
    }
    match policy {
        RewardPolicy::Flat => 1e-6,
        RewardPolicy::Decaying => {
            let total = inputs.total_chunks.max(1) as f64;
            let decay = (inputs.total_chunks as f64 - inputs.total_done_chunks as f64
                + inputs.worker_done_count as f64)
                / total;
            1.0 + (999.0 * decay).round()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duplicate(total: usize, done: usize, worker_done: usize) -> RewardInputs {
        RewardInputs {
            first_completion: false,
            total_chunks: total,
            total_done_chunks: done,
            worker_done_count: worker_done,
        }
    }

    #[test]
    fn first_completion_pays_one_under_both_policies() {
        let inputs = RewardInputs {
            first_completion: true,
            total_chunks: 10,
            total_done_chunks: 3,
            worker_done_count: 2,
        };
        assert_eq!(reward_increment(RewardPolicy::Flat, inputs), 1.0);
        assert_eq!(reward_increment(RewardPolicy::Decaying, inputs), 1.0);
    }

    #[test]
    fn flat_duplicate_pays_epsilon() {
        assert_eq!(
            reward_increment(RewardPolicy::Flat, duplicate(10, 5, 3)),
            1e-6
        );
    }

    #[test]
    fn decaying_duplicate_matches_formula() {
        // decay = (10 - 4 + 2) / 10 = 0.8 -> 1 + round(999 * 0.8) = 800
        assert_eq!(
            reward_increment(RewardPolicy::Decaying, duplicate(10, 4, 2)),
            800.0
        );
    }

    #[test]
    fn decaying_pays_more_for_productive_workers() {
        let lazy = reward_increment(RewardPolicy::Decaying, duplicate(10, 5, 0));
        let productive = reward_increment(RewardPolicy::Decaying, duplicate(10, 5, 4));
        assert!(productive > lazy);
    }

    #[test]
    fn parse_accepts_both_policies() {
        assert_eq!(RewardPolicy::parse("flat"), Some(RewardPolicy::Flat));
        assert_eq!(RewardPolicy::parse("Decaying"), Some(RewardPolicy::Decaying));
        assert_eq!(RewardPolicy::parse("bogus"), None);
    }
}

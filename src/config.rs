//! Configuration types.

use crate::coordinator::RewardPolicy;

/// Server configuration, resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP API listens on.
    pub port: u16,
    /// Total number of items in the workload.
    pub total_items: u64,
    /// Items per chunk (the last chunk may be shorter).
    pub chunk_size: u64,
    /// Duplicate-completion payout policy.
    pub reward_policy: RewardPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7290,
            total_items: 8192,
            chunk_size: 96,
            reward_policy: RewardPolicy::Flat,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `FOREMAN_*` environment variables,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("FOREMAN_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let total_items = std::env::var("FOREMAN_TOTAL_ITEMS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.total_items);

        let chunk_size = std::env::var("FOREMAN_CHUNK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.chunk_size);

        let reward_policy = std::env::var("FOREMAN_REWARD_POLICY")
            .ok()
            .and_then(|v| RewardPolicy::parse(&v))
            .unwrap_or(defaults.reward_policy);

        Self {
            port,
            total_items,
            chunk_size,
            reward_policy,
        }
    }
}

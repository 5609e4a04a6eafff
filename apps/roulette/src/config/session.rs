//! Session configuration loaded from the environment.
//!
//! | variable                 | meaning                                  |
//! |--------------------------|------------------------------------------|
//! | `ROULETTE_RESOURCE_POOL` | comma-separated resource ids             |
//! | `ROULETTE_ALIVE_PER_RUN` | resources dealt to each participant      |
//! | `ROULETTE_RNG_SEED`      | u64 seed; unset means OS entropy         |

use std::env;

use crate::config::resource_pool::{default_pool, parse_pool};
use crate::domain::ResourceId;
use crate::error::SessionError;

pub const DEFAULT_ALIVE_PER_RUN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Global pool that starting inventories are sampled from.
    pub resource_pool: Vec<ResourceId>,
    /// Resources each participant starts a run with.
    pub alive_per_run: usize,
    /// Seed for every random draw; `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resource_pool: default_pool(),
            alive_per_run: DEFAULT_ALIVE_PER_RUN,
            rng_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(raw) = get("ROULETTE_RESOURCE_POOL") {
            config.resource_pool = parse_pool(&raw);
        }
        if let Some(raw) = get("ROULETTE_ALIVE_PER_RUN") {
            config.alive_per_run = raw.parse().map_err(|_| {
                SessionError::config(format!("ROULETTE_ALIVE_PER_RUN must be an integer, got {raw:?}"))
            })?;
        }
        if let Some(raw) = get("ROULETTE_RNG_SEED") {
            config.rng_seed = Some(raw.parse().map_err(|_| {
                SessionError::config(format!("ROULETTE_RNG_SEED must be a u64, got {raw:?}"))
            })?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_pool(mut self, pool: Vec<ResourceId>) -> Self {
        self.resource_pool = pool;
        self
    }

    pub fn with_alive_per_run(mut self, count: usize) -> Self {
        self.alive_per_run = count;
        self
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.alive_per_run == 0 {
            return Err(SessionError::config("alive_per_run must be at least 1"));
        }
        if self.resource_pool.len() < self.alive_per_run {
            return Err(SessionError::config(format!(
                "resource pool has {} entries, need at least {}",
                self.resource_pool.len(),
                self.alive_per_run
            )));
        }
        Ok(())
    }
}

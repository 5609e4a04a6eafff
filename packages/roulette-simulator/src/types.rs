//! Shared types for the simulator.

use serde::Serialize;

/// One JSON line per simulated run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub run: u32,
    pub seed: u64,
    pub participants: usize,
    /// Value of `runCounter` after the run, unchanged if it never reset.
    pub run_counter: u32,
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    /// False when `--max-rounds` was hit first.
    pub reset: bool,
    pub eliminated: Vec<String>,
    pub duration_ms: f64,
}

// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Side-by-Side Comparison
// ─────────────────────────────────────────────────────────────────────
//! Replays one attack sequence against several engines in parallel.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fusion_core::FusionSystem;
use fusion_types::{FusionError, FusionResult};

use crate::driver::{RunStats, SimulationDriver};
use crate::stimulus::AttackSequence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub stats: RunStats,
}

/// Results of one comparison, in the order the systems were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub seed: u64,
    pub rounds: usize,
    pub cooldown_rounds: usize,
    pub entries: Vec<ComparisonEntry>,
}

impl ComparisonReport {
    pub fn get(&self, name: &str) -> Option<&RunStats> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.stats)
    }

    pub fn to_json(&self) -> FusionResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FusionError::Config(format!("JSON encode error: {e}")))
    }
}

/// Run every system over the same `sequence` on its own scoped thread.
///
/// A panic inside any engine is propagated to the caller.
pub fn compare(
    systems: Vec<Box<dyn FusionSystem>>,
    sequence: Arc<AttackSequence>,
    rounds: usize,
    driver: &SimulationDriver,
) -> ComparisonReport {
    if rounds > sequence.len() {
        log::warn!(
            "comparison asks for {rounds} rounds but the sequence holds {}; \
             later rounds see no attack",
            sequence.len()
        );
    }

    let entries: Vec<ComparisonEntry> = std::thread::scope(|s| {
        let handles: Vec<_> = systems
            .into_iter()
            .map(|mut system| {
                let sequence = Arc::clone(&sequence);
                s.spawn(move || {
                    let stats = driver.run(system.as_mut(), &*sequence, rounds);
                    ComparisonEntry {
                        name: system.name().to_string(),
                        stats,
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(entry) => entry,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });

    ComparisonReport {
        seed: sequence.seed(),
        rounds,
        cooldown_rounds: driver.cooldown_rounds,
        entries,
    }
}

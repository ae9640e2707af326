// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Round Driver
// ─────────────────────────────────────────────────────────────────────
//! Runs a `FusionSystem` against a `StimulusSource` with cooldown
//! pacing: after a roster replacement the system sits out
//! `cooldown_rounds` rounds before it is recovered and judged again.

use serde::{Deserialize, Serialize};

use fusion_core::FusionSystem;
use fusion_types::{Signal, UnitId};

use crate::stimulus::StimulusSource;

/// Decision counts of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub rounds: usize,
    pub judged_rounds: usize,
    /// Rounds spent in cooldown after a replacement.
    pub skipped_rounds: usize,
    pub correct_decisions: usize,
    pub error_decisions: usize,
    pub scheduled_decisions: usize,
    pub replacements: u64,
}

impl RunStats {
    /// Share of judged rounds that fused to `CORRECT`. A `SCHEDULED`
    /// round counts against it.
    pub fn accuracy(&self) -> f64 {
        if self.judged_rounds == 0 {
            return 0.0;
        }
        self.correct_decisions as f64 / self.judged_rounds as f64
    }

    /// Share of rounds in which the system produced a decision at all.
    pub fn availability(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        self.judged_rounds as f64 / self.rounds as f64
    }

    fn record(&mut self, fused: Signal) {
        self.judged_rounds += 1;
        match fused {
            Signal::Correct => self.correct_decisions += 1,
            Signal::Error(_) => self.error_decisions += 1,
            Signal::Scheduled => self.scheduled_decisions += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationDriver {
    /// Rounds skipped while a replacement is pending.
    /// Default: 5.
    pub cooldown_rounds: usize,
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self { cooldown_rounds: 5 }
    }
}

impl SimulationDriver {
    pub fn new(cooldown_rounds: usize) -> Self {
        Self { cooldown_rounds }
    }

    /// Drive `system` for `rounds` rounds, reading round `r` from `source`.
    pub fn run<S>(&self, system: &mut S, source: &dyn StimulusSource, rounds: usize) -> RunStats
    where
        S: FusionSystem + ?Sized,
    {
        let mut stats = RunStats {
            rounds,
            ..RunStats::default()
        };
        let replacements_before = system.scheduled_count();
        let mut cooldown = 0usize;

        for round in 0..rounds {
            if system.is_scheduled() && cooldown < self.cooldown_rounds {
                cooldown += 1;
                stats.skipped_rounds += 1;
                continue;
            }
            cooldown = 0;
            system.recover();

            let ids: Vec<UnitId> = system.get_status().into_keys().collect();
            let fused = system.step(&source.stimuli(&ids, round));
            log::debug!("{} round {round}: {fused}", system.name());
            stats.record(fused);
        }

        stats.replacements = system.scheduled_count() - replacements_before;
        log::info!(
            "{}: {} rounds, accuracy {:.3}, availability {:.3}, {} replacements",
            system.name(),
            stats.rounds,
            stats.accuracy(),
            stats.availability(),
            stats.replacements
        );
        stats
    }
}

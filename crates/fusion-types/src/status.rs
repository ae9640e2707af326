// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Status Snapshots
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::signal::Signal;

/// Observable state of one execution unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStatus {
    pub weight: f64,
    /// Classification boundary the unit was provisioned with.
    pub attack_threshold: f64,
    pub active: bool,
    pub soft_retired: bool,
    /// Correct entries currently in the trust window.
    pub recent_correct: usize,
    /// Entries currently in the trust window.
    pub window_len: usize,
    /// Beta posterior mean accuracy.
    pub accuracy: f64,
    pub consecutive_corrects: u32,
    /// Most recent output (None until the unit has classified a stimulus).
    pub last_output: Option<Signal>,
}

/// Why the judge asked for a roster replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleTrigger {
    /// No active unit was available to vote.
    EmptyRoster,
    /// Every label's average trust fell below the trust threshold.
    Untrusted,
    /// Vote dispersion reached the dispersion threshold.
    Dispersion,
}

/// Per-label vote aggregate from one judgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTally {
    pub label: Signal,
    /// Sum of the weights of active units voting this label.
    pub weight: f64,
    /// Mean Beta accuracy of those units.
    pub avg_trust: f64,
    pub voters: usize,
}

/// Full breakdown of one judgement.
///
/// Tallies are sorted in decision order (descending weight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Signal,
    pub tallies: Vec<LabelTally>,
    pub dispersion: f64,
    pub trigger: Option<ScheduleTrigger>,
    pub active_units: usize,
}

impl Verdict {
    /// Verdict for a round with no active voters.
    pub fn empty_roster() -> Self {
        Self {
            decision: Signal::Scheduled,
            tallies: Vec::new(),
            dispersion: 0.0,
            trigger: Some(ScheduleTrigger::EmptyRoster),
            active_units: 0,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.decision.is_scheduled()
    }

    /// Tally for a specific label, if any active unit voted it.
    pub fn tally(&self, label: Signal) -> Option<&LabelTally> {
        self.tallies.iter().find(|t| t.label == label)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Fusion Judge
// ─────────────────────────────────────────────────────────────────────
//! Weighted-plurality judgement with two replacement triggers.
//!
//! 1. Sum the weights of active units per output label.
//! 2. Average the Beta accuracy of the active units behind each label.
//! 3. **Integrity**: if no label reaches `trust_threshold`, the whole
//!    ensemble is suspect → `SCHEDULED`.
//! 4. **Stability**: if vote dispersion reaches `dispersion_threshold`
//!    → `SCHEDULED`.
//! 5. Otherwise the heaviest label that is trusted wins; if none is
//!    trusted the heaviest label wins regardless.
//!
//! Labels of equal weight are ordered by higher average trust, then by
//! signal order, so the outcome is independent of map iteration.

use std::collections::BTreeMap;

use fusion_types::{
    FusionConfig, FusionError, FusionResult, LabelTally, Outputs, ScheduleTrigger, Signal,
    Verdict,
};

use crate::dispersion::dispersion;
use crate::unit::Roster;

#[derive(Default)]
struct LabelAccumulator {
    weight: f64,
    trust_sum: f64,
    voters: usize,
}

/// Stateless judgement rule parameterised by its two thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionJudge {
    pub trust_threshold: f64,
    pub dispersion_threshold: f64,
}

impl FusionJudge {
    pub fn new(trust_threshold: f64, dispersion_threshold: f64) -> Self {
        Self {
            trust_threshold,
            dispersion_threshold,
        }
    }

    pub fn from_config(config: &FusionConfig) -> Self {
        Self::new(config.trust_threshold, config.dispersion_threshold)
    }

    /// Aggregate active units' outputs into a verdict.
    ///
    /// Outputs from unknown or soft-retired units are ignored. Returns
    /// `FusionError::EmptyRoster` when no active unit voted.
    pub fn evaluate(&self, outputs: &Outputs, roster: &Roster) -> FusionResult<Verdict> {
        let mut labels: BTreeMap<Signal, LabelAccumulator> = BTreeMap::new();
        let mut active_units = 0usize;

        for (uid, label) in outputs {
            let Some(unit) = roster.get(uid) else {
                continue;
            };
            if !unit.is_active() {
                continue;
            }
            let acc = labels.entry(*label).or_default();
            acc.weight += unit.weight();
            acc.trust_sum += unit.accuracy();
            acc.voters += 1;
            active_units += 1;
        }

        if labels.is_empty() {
            return Err(FusionError::EmptyRoster);
        }

        let mut tallies: Vec<LabelTally> = labels
            .into_iter()
            .map(|(label, acc)| LabelTally {
                label,
                weight: acc.weight,
                avg_trust: acc.trust_sum / acc.voters as f64,
                voters: acc.voters,
            })
            .collect();

        let weights: Vec<f64> = tallies.iter().map(|t| t.weight).collect();
        let dispersion = dispersion(&weights);

        // Stable sort keeps signal order for exact ties.
        tallies.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| b.avg_trust.total_cmp(&a.avg_trust))
        });

        let (decision, trigger) = self.decide(&tallies, dispersion);

        log::debug!(
            "judge: decision={decision} dispersion={dispersion:.4} active={active_units} labels={}",
            tallies.len()
        );

        Ok(Verdict {
            decision,
            tallies,
            dispersion,
            trigger,
            active_units,
        })
    }

    fn decide(&self, tallies: &[LabelTally], dispersion: f64) -> (Signal, Option<ScheduleTrigger>) {
        if tallies
            .iter()
            .all(|t| t.avg_trust < self.trust_threshold)
        {
            log::info!(
                "no label reaches trust threshold {}, scheduling roster replacement",
                self.trust_threshold
            );
            return (Signal::Scheduled, Some(ScheduleTrigger::Untrusted));
        }

        if dispersion >= self.dispersion_threshold {
            log::info!(
                "vote dispersion {dispersion:.4} >= {}, scheduling roster replacement",
                self.dispersion_threshold
            );
            return (Signal::Scheduled, Some(ScheduleTrigger::Dispersion));
        }

        let decision = tallies
            .iter()
            .find(|t| t.avg_trust >= self.trust_threshold)
            .or_else(|| tallies.first())
            .map_or(Signal::Scheduled, |t| t.label);
        (decision, None)
    }
}

impl Default for FusionJudge {
    fn default() -> Self {
        Self::from_config(&FusionConfig::default())
    }
}

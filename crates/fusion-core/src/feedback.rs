// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Feedback & Roster Scheduling
// ─────────────────────────────────────────────────────────────────────
//! Post-round feedback and full-roster replacement.
//!
//! Feedback reinforces agreement exponentially: a unit that matches the
//! fused decision has its weight multiplied by `1 + decay`, any other
//! unit by `1 - decay`, clamped to [0, 1]. A `SCHEDULED` decision counts
//! as disagreement for every unit.

use fusion_types::{FusionConfig, Outputs, Signal, UnitId};

use crate::unit::{Roster, UnitTransition};

/// State changes observed during one feedback pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackSummary {
    pub updated: usize,
    /// Output entries whose unit no longer exists.
    pub skipped: usize,
    pub retired: Vec<UnitId>,
    pub recovered: Vec<UnitId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightUpdater {
    pub decay: f64,
    pub trust_threshold: f64,
}

impl WeightUpdater {
    pub fn new(decay: f64, trust_threshold: f64) -> Self {
        Self {
            decay,
            trust_threshold,
        }
    }

    pub fn from_config(config: &FusionConfig) -> Self {
        Self::new(config.decay, config.trust_threshold)
    }

    /// Apply one round of feedback to every unit that produced an output.
    pub fn update_feedback(
        &self,
        roster: &mut Roster,
        outputs: &Outputs,
        fused: Signal,
    ) -> FeedbackSummary {
        let mut summary = FeedbackSummary::default();

        for (uid, output) in outputs {
            let Some(unit) = roster.get_mut(uid) else {
                summary.skipped += 1;
                continue;
            };

            let is_correct = !fused.is_scheduled() && *output == fused;
            match unit.record_result(is_correct, fused, self.trust_threshold) {
                Some(UnitTransition::Retired) => summary.retired.push(uid.clone()),
                Some(UnitTransition::Recovered) => summary.recovered.push(uid.clone()),
                None => {}
            }

            let factor = if is_correct {
                1.0 + self.decay
            } else {
                1.0 - self.decay
            };
            unit.scale_weight(factor);
            summary.updated += 1;
        }

        if summary.skipped > 0 {
            log::debug!("feedback skipped {} outputs from replaced units", summary.skipped);
        }
        summary
    }
}

/// Destroy and recreate every unit under its id from its own config.
///
/// Returns the number of units reprovisioned.
pub fn replace_roster(roster: &mut Roster) -> usize {
    for unit in roster.values_mut() {
        *unit = unit.reprovision();
    }
    log::info!("roster replaced: {} units reprovisioned", roster.len());
    roster.len()
}

#[cfg(test)]
mod tests {
    use fusion_types::UnitConfig;

    use super::*;
    use crate::unit::ExecutionUnit;

    fn roster(n: usize) -> Roster {
        (0..n)
            .map(|i| {
                let id = format!("unit_{i}");
                let unit = ExecutionUnit::new(id.clone(), UnitConfig::default()).unwrap();
                (id, unit)
            })
            .collect()
    }

    #[test]
    fn test_agreeing_units_gain_weight() {
        let mut r = roster(2);
        r.get_mut("unit_0").unwrap().scale_weight(0.5);
        let out: Outputs = [
            ("unit_0".to_string(), Signal::Correct),
            ("unit_1".to_string(), Signal::Error(0)),
        ]
        .into_iter()
        .collect();
        let summary = WeightUpdater::new(0.1, 0.5).update_feedback(&mut r, &out, Signal::Correct);
        assert_eq!(summary.updated, 2);
        assert!((r["unit_0"].weight() - 0.55).abs() < 1e-12);
        assert!((r["unit_1"].weight() - 0.9).abs() < 1e-12);
        assert_eq!(summary.retired, vec!["unit_1".to_string()]);
    }

    #[test]
    fn test_weight_capped_at_one() {
        let mut r = roster(1);
        let out: Outputs = [("unit_0".to_string(), Signal::Correct)].into_iter().collect();
        let updater = WeightUpdater::new(0.1, 0.5);
        for _ in 0..5 {
            updater.update_feedback(&mut r, &out, Signal::Correct);
        }
        assert_eq!(r["unit_0"].weight(), 1.0);
    }

    #[test]
    fn test_scheduled_penalises_everyone_without_retiring() {
        let mut r = roster(3);
        let out: Outputs = r.keys().map(|k| (k.clone(), Signal::Correct)).collect();
        let summary = WeightUpdater::new(0.1, 0.5).update_feedback(&mut r, &out, Signal::Scheduled);
        assert!(summary.retired.is_empty());
        for unit in r.values() {
            assert!((unit.weight() - 0.9).abs() < 1e-12);
            assert!(unit.is_active());
            assert_eq!(unit.trust_window().correct(), 9);
        }
    }

    #[test]
    fn test_unknown_ids_skipped() {
        let mut r = roster(1);
        let out: Outputs = [
            ("unit_0".to_string(), Signal::Correct),
            ("gone".to_string(), Signal::Correct),
        ]
        .into_iter()
        .collect();
        let summary = WeightUpdater::new(0.1, 0.5).update_feedback(&mut r, &out, Signal::Correct);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_recovery_reported() {
        let mut r = roster(1);
        let updater = WeightUpdater::new(0.1, 0.5);
        let wrong: Outputs = [("unit_0".to_string(), Signal::Error(0))].into_iter().collect();
        let right: Outputs = [("unit_0".to_string(), Signal::Correct)].into_iter().collect();
        updater.update_feedback(&mut r, &wrong, Signal::Correct);
        assert!(r["unit_0"].is_soft_retired());
        let summary = updater.update_feedback(&mut r, &right, Signal::Correct);
        assert_eq!(summary.recovered, vec!["unit_0".to_string()]);
    }

    #[test]
    fn test_replace_roster_resets() {
        let mut r = roster(3);
        let out: Outputs = r.keys().map(|k| (k.clone(), Signal::Error(0))).collect();
        WeightUpdater::new(0.1, 0.5).update_feedback(&mut r, &out, Signal::Correct);
        assert!(r.values().all(|u| u.is_soft_retired()));

        assert_eq!(replace_roster(&mut r), 3);
        for (id, unit) in &r {
            assert_eq!(unit.unit_id(), id);
            assert!(unit.is_active());
            assert_eq!(unit.weight(), 1.0);
            assert!(unit.trust_window().is_pristine());
        }
    }
}

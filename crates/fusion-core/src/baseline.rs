// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Plain Majority Baseline
// ─────────────────────────────────────────────────────────────────────
//! Reference engine for side-by-side comparison.
//!
//! Every unit votes with weight 1, there is no trust estimator and no
//! recovery: a unit that disagrees with the fused decision is switched
//! off until the next roster replacement. A tie for first place, or a
//! round with no active voter, yields `SCHEDULED`.

use std::collections::BTreeMap;

use fusion_types::{
    FusionError, FusionResult, Outputs, Signal, Stimuli, UnitConfig, UnitId, UnitStatus,
};

use crate::system::FusionSystem;
use crate::trust::beta_accuracy;
use crate::unit::classify;

#[derive(Debug, Clone)]
struct MajorityUnit {
    attack_threshold: f64,
    active: bool,
    last_output: Option<Signal>,
}

impl MajorityUnit {
    fn new(attack_threshold: f64) -> Self {
        Self {
            attack_threshold,
            active: true,
            last_output: None,
        }
    }
}

pub struct MajorityEngine {
    error_variants: usize,
    units: BTreeMap<UnitId, MajorityUnit>,
    outputs: Outputs,
    is_scheduled: bool,
    scheduled_count: u64,
}

impl MajorityEngine {
    pub fn new(error_variants: usize) -> FusionResult<Self> {
        if error_variants < 1 {
            return Err(FusionError::InvalidParameter(
                "error_variants must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            error_variants,
            units: BTreeMap::new(),
            outputs: Outputs::new(),
            is_scheduled: false,
            scheduled_count: 0,
        })
    }

    /// Baseline with one unit per attack threshold, named `unit_0`, `unit_1`, ….
    pub fn with_thresholds(error_variants: usize, thresholds: &[f64]) -> FusionResult<Self> {
        let mut engine = Self::new(error_variants)?;
        for (i, &attack_threshold) in thresholds.iter().enumerate() {
            engine.add_unit(
                &format!("unit_{i}"),
                UnitConfig::with_attack_threshold(attack_threshold),
            )?;
        }
        Ok(engine)
    }

    pub fn active_count(&self) -> usize {
        self.units.values().filter(|u| u.active).count()
    }
}

impl FusionSystem for MajorityEngine {
    fn name(&self) -> &str {
        "majority"
    }

    /// Only `attack_threshold` is honoured; weight is fixed at 1.
    fn add_unit(&mut self, unit_id: &str, config: UnitConfig) -> FusionResult<()> {
        config.validate()?;
        self.units
            .insert(unit_id.to_string(), MajorityUnit::new(config.attack_threshold));
        Ok(())
    }

    fn collect_outputs(&mut self, stimuli: &Stimuli) -> Outputs {
        let error_variants = self.error_variants;
        self.outputs = self
            .units
            .iter_mut()
            .map(|(uid, unit)| {
                let stimulus = stimuli.get(uid).copied().unwrap_or(0.0);
                let signal = classify(stimulus, unit.attack_threshold, error_variants);
                unit.last_output = Some(signal);
                (uid.clone(), signal)
            })
            .collect();
        self.outputs.clone()
    }

    fn judge(&mut self) -> Signal {
        let mut votes: BTreeMap<Signal, usize> = BTreeMap::new();
        for (uid, label) in &self.outputs {
            if self.units.get(uid).is_some_and(|u| u.active) {
                *votes.entry(*label).or_default() += 1;
            }
        }

        let top = votes.values().copied().max().unwrap_or(0);
        let leaders: Vec<Signal> = votes
            .iter()
            .filter(|(_, &count)| count == top)
            .map(|(label, _)| *label)
            .collect();

        let decision = match leaders.as_slice() {
            [only] => *only,
            [] => {
                log::warn!("majority baseline has no active units, scheduling replacement");
                Signal::Scheduled
            }
            _ => {
                log::info!("majority baseline tie between {} labels", leaders.len());
                Signal::Scheduled
            }
        };
        self.is_scheduled = decision.is_scheduled();
        decision
    }

    fn schedule(&mut self) {
        if !self.is_scheduled {
            return;
        }
        for unit in self.units.values_mut() {
            *unit = MajorityUnit::new(unit.attack_threshold);
        }
        self.scheduled_count += 1;
        log::info!("majority baseline roster replaced");
    }

    fn update_feedback(&mut self, outputs: &Outputs, fused: Signal) {
        if fused.is_scheduled() {
            return;
        }
        for (uid, output) in outputs {
            if let Some(unit) = self.units.get_mut(uid) {
                if unit.active && *output != fused {
                    unit.active = false;
                    log::info!("majority baseline deactivated unit {uid}");
                }
            }
        }
    }

    fn recover(&mut self) {
        self.is_scheduled = false;
    }

    fn is_scheduled(&self) -> bool {
        self.is_scheduled
    }

    fn scheduled_count(&self) -> u64 {
        self.scheduled_count
    }

    fn get_status(&self) -> BTreeMap<UnitId, UnitStatus> {
        self.units
            .iter()
            .map(|(uid, unit)| {
                let status = UnitStatus {
                    weight: 1.0,
                    attack_threshold: unit.attack_threshold,
                    active: unit.active,
                    soft_retired: !unit.active,
                    recent_correct: 0,
                    window_len: 0,
                    // Uninformed prior: no history is kept.
                    accuracy: beta_accuracy(0, 0),
                    consecutive_corrects: 0,
                    last_output: unit.last_output,
                };
                (uid.clone(), status)
            })
            .collect()
    }
}

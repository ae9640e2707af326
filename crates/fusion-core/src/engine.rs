// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Fusion Engine
// ─────────────────────────────────────────────────────────────────────
//! Round orchestrator that owns the unit roster.
//!
//! Per round: `collect_outputs` → `judge` → `schedule` →
//! `update_feedback`. The engine holds no global state and performs no
//! I/O; observers read `get_status()` and `last_verdict()` to log it.

use std::collections::BTreeMap;

use fusion_types::{
    FusionConfig, FusionResult, Outputs, Signal, Stimuli, UnitConfig, UnitId, UnitStatus, Verdict,
};

use crate::feedback::{replace_roster, FeedbackSummary, WeightUpdater};
use crate::judge::FusionJudge;
use crate::system::FusionSystem;
use crate::unit::{ExecutionUnit, Roster};

/// Adaptive weighted-plurality fusion engine.
pub struct FusionEngine {
    config: FusionConfig,
    judge: FusionJudge,
    updater: WeightUpdater,
    units: Roster,
    outputs: Outputs,
    is_scheduled: bool,
    scheduled_count: u64,
    last_verdict: Option<Verdict>,
    last_feedback: FeedbackSummary,
}

impl FusionEngine {
    /// Build an engine with an empty roster. Rejects invalid config.
    pub fn new(config: FusionConfig) -> FusionResult<Self> {
        config.validate()?;
        Ok(Self {
            judge: FusionJudge::from_config(&config),
            updater: WeightUpdater::from_config(&config),
            config,
            units: Roster::new(),
            outputs: Outputs::new(),
            is_scheduled: false,
            scheduled_count: 0,
            last_verdict: None,
            last_feedback: FeedbackSummary::default(),
        })
    }

    /// Engine whose units all use `config.default_unit` with the given
    /// attack thresholds, named `unit_0`, `unit_1`, ….
    pub fn with_thresholds(config: FusionConfig, thresholds: &[f64]) -> FusionResult<Self> {
        let mut engine = Self::new(config)?;
        for (i, &attack_threshold) in thresholds.iter().enumerate() {
            let unit = UnitConfig {
                attack_threshold,
                ..engine.config.default_unit.clone()
            };
            engine.add_unit(&format!("unit_{i}"), unit)?;
        }
        Ok(engine)
    }

    /// Register a unit with the engine's default unit parameters.
    pub fn add_default_unit(&mut self, unit_id: &str) -> FusionResult<()> {
        let config = self.config.default_unit.clone();
        self.add_unit(unit_id, config)
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn unit(&self, unit_id: &str) -> Option<&ExecutionUnit> {
        self.units.get(unit_id)
    }

    pub fn unit_mut(&mut self, unit_id: &str) -> Option<&mut ExecutionUnit> {
        self.units.get_mut(unit_id)
    }

    pub fn units(&self) -> impl Iterator<Item = &ExecutionUnit> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.units.values().filter(|u| u.is_active()).count()
    }

    /// Outputs of the most recent `collect_outputs` call.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Full breakdown of the most recent judgement.
    pub fn last_verdict(&self) -> Option<&Verdict> {
        self.last_verdict.as_ref()
    }

    /// Retirements and recoveries from the most recent feedback pass.
    pub fn last_feedback(&self) -> &FeedbackSummary {
        &self.last_feedback
    }
}

impl FusionSystem for FusionEngine {
    fn name(&self) -> &str {
        "adaptive"
    }

    fn add_unit(&mut self, unit_id: &str, config: UnitConfig) -> FusionResult<()> {
        let unit = ExecutionUnit::new(unit_id, config)?;
        if self.units.insert(unit_id.to_string(), unit).is_some() {
            log::warn!("unit {unit_id} re-added, previous state discarded");
        }
        Ok(())
    }

    fn collect_outputs(&mut self, stimuli: &Stimuli) -> Outputs {
        let error_variants = self.config.error_variants;
        self.outputs = self
            .units
            .iter_mut()
            .map(|(uid, unit)| {
                let stimulus = stimuli.get(uid).copied().unwrap_or(0.0);
                (uid.clone(), unit.generate_output(stimulus, error_variants))
            })
            .collect();
        self.outputs.clone()
    }

    fn judge(&mut self) -> Signal {
        let verdict = self
            .judge
            .evaluate(&self.outputs, &self.units)
            .unwrap_or_else(|e| {
                log::warn!("{e}; treating round as SCHEDULED");
                Verdict::empty_roster()
            });
        self.is_scheduled = verdict.is_scheduled();
        let decision = verdict.decision;
        self.last_verdict = Some(verdict);
        decision
    }

    fn schedule(&mut self) {
        if !self.is_scheduled {
            return;
        }
        replace_roster(&mut self.units);
        self.scheduled_count += 1;
    }

    fn update_feedback(&mut self, outputs: &Outputs, fused: Signal) {
        self.last_feedback = self.updater.update_feedback(&mut self.units, outputs, fused);
    }

    fn recover(&mut self) {
        if self.is_scheduled {
            log::debug!("replacement flag cleared");
            self.is_scheduled = false;
        }
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
            .map(|(uid, unit)| (uid.clone(), unit.status()))
            .collect()
    }
}

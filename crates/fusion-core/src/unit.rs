// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Execution Unit
// ─────────────────────────────────────────────────────────────────────
//! A single redundant classifier with its own weight, trust window and
//! soft-retirement / recovery state machine.
//!
//! ```text
//!            disagreement x error_threshold
//!            or accuracy < trust_threshold
//!            (never on a SCHEDULED round)
//!   ACTIVE ───────────────────────────────▶ SOFT_RETIRED
//!     ▲                                          │
//!     └──────────────────────────────────────────┘
//!            recovery_threshold consecutive
//!            agreeing rounds
//! ```
//!
//! The trust window is fed every round in both states, so recovery is
//! driven by evidence rather than elapsed time.

use std::collections::BTreeMap;

use fusion_types::{clamp_bounded, FusionResult, Signal, UnitConfig, UnitId, UnitStatus};
use serde::{Deserialize, Serialize};

use crate::trust::TrustWindow;

/// The units owned by one engine, keyed by id.
pub type Roster = BTreeMap<UnitId, ExecutionUnit>;

/// Classify a stimulus against an attack threshold.
///
/// `margin < 0` is a clean pass. Otherwise the margin selects one of
/// `error_variants` severity labels, larger margins picking more severe
/// ones. A NaN stimulus is treated as the mildest attack.
pub fn classify(stimulus: f64, attack_threshold: f64, error_variants: usize) -> Signal {
    let margin = stimulus - attack_threshold;
    if margin.is_nan() {
        log::warn!("classify: non-finite margin for stimulus {stimulus}, treating as attack");
        return Signal::Error(0);
    }
    if margin < 0.0 {
        return Signal::Correct;
    }
    let variants = error_variants.max(1);
    // Float-to-int casts saturate, so an infinite margin lands on the last variant.
    let idx = ((margin * variants as f64).floor() as usize).min(variants - 1);
    Signal::Error(idx)
}

/// Participation state of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitState {
    Active,
    SoftRetired,
}

/// State change produced by one round of feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitTransition {
    Retired,
    Recovered,
}

#[derive(Debug, Clone)]
pub struct ExecutionUnit {
    unit_id: UnitId,
    config: UnitConfig,
    weight: f64,
    state: UnitState,
    recent_results: TrustWindow,
    consecutive_corrects: u32,
    consecutive_errors: u32,
    last_output: Option<Signal>,
}

impl ExecutionUnit {
    /// Provision a unit. Rejects out-of-range parameters.
    pub fn new(unit_id: impl Into<UnitId>, config: UnitConfig) -> FusionResult<Self> {
        config.validate()?;
        Ok(Self::provision(unit_id.into(), config))
    }

    fn provision(unit_id: UnitId, config: UnitConfig) -> Self {
        Self {
            weight: config.weight,
            state: UnitState::Active,
            recent_results: TrustWindow::new(config.window_size),
            consecutive_corrects: 0,
            consecutive_errors: 0,
            last_output: None,
            unit_id,
            config,
        }
    }

    /// A brand-new unit under the same id and configuration.
    pub fn reprovision(&self) -> Self {
        Self::provision(self.unit_id.clone(), self.config.clone())
    }

    /// Classify this round's stimulus and remember the result.
    pub fn generate_output(&mut self, stimulus: f64, error_variants: usize) -> Signal {
        let signal = classify(stimulus, self.config.attack_threshold, error_variants);
        self.last_output = Some(signal);
        signal
    }

    /// Feed one round's correctness into the trust window and run the
    /// state machine.
    pub fn record_result(
        &mut self,
        is_correct: bool,
        fused: Signal,
        trust_threshold: f64,
    ) -> Option<UnitTransition> {
        self.recent_results.record(is_correct);

        match self.state {
            UnitState::SoftRetired => {
                if !is_correct {
                    self.consecutive_corrects = 0;
                    return None;
                }
                self.consecutive_corrects += 1;
                if self.consecutive_corrects >= self.config.recovery_threshold {
                    self.state = UnitState::Active;
                    self.consecutive_errors = 0;
                    log::info!(
                        "unit {} recovered after {} consecutive correct rounds",
                        self.unit_id,
                        self.consecutive_corrects
                    );
                    return Some(UnitTransition::Recovered);
                }
                None
            }
            UnitState::Active => {
                // A SCHEDULED round says nothing about this unit in particular.
                if is_correct {
                    self.consecutive_errors = 0;
                } else if !fused.is_scheduled() {
                    self.consecutive_errors += 1;
                }

                let acc = self.recent_results.accuracy();
                let distrusted = self.consecutive_errors >= self.config.error_threshold
                    || acc < trust_threshold;
                if distrusted && !fused.is_scheduled() {
                    self.state = UnitState::SoftRetired;
                    self.consecutive_corrects = 0;
                    self.consecutive_errors = 0;
                    log::info!(
                        "unit {} soft-retired: accuracy {acc:.3} (threshold {trust_threshold}), \
                         agreed={is_correct}, fused={fused}",
                        self.unit_id
                    );
                    return Some(UnitTransition::Retired);
                }
                None
            }
        }
    }

    /// Multiply the weight by `factor`, clamped to [0, 1].
    pub fn scale_weight(&mut self, factor: f64) {
        self.weight = clamp_bounded(self.weight * factor, 0.0, 1.0);
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == UnitState::Active
    }

    pub fn is_soft_retired(&self) -> bool {
        self.state == UnitState::SoftRetired
    }

    pub fn consecutive_corrects(&self) -> u32 {
        self.consecutive_corrects
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn trust_window(&self) -> &TrustWindow {
        &self.recent_results
    }

    /// Beta posterior mean accuracy over the trust window.
    pub fn accuracy(&self) -> f64 {
        self.recent_results.accuracy()
    }

    pub fn last_output(&self) -> Option<Signal> {
        self.last_output
    }

    pub fn status(&self) -> UnitStatus {
        UnitStatus {
            weight: self.weight,
            attack_threshold: self.config.attack_threshold,
            active: self.is_active(),
            soft_retired: self.is_soft_retired(),
            recent_correct: self.recent_results.correct(),
            window_len: self.recent_results.len(),
            accuracy: self.accuracy(),
            consecutive_corrects: self.consecutive_corrects,
            last_output: self.last_output,
        }
    }
}

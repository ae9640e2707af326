// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Stimulus Sources
// ─────────────────────────────────────────────────────────────────────
//! Per-round attack strengths fed to execution units.
//!
//! `AttackSequence` pregenerates the whole `round × unit` table from a
//! seed so that several engines can be replayed against exactly the
//! same attacks, from different threads, through an `Arc`.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use fusion_types::{FusionError, FusionResult, Stimuli, UnitConfig, UnitId, UnitStatus};

/// Source of the stimulus a unit sees in a given round.
pub trait StimulusSource: Send + Sync {
    fn get(&self, unit_id: &str, round: usize) -> f64;

    /// Stimuli for every id in `unit_ids` at `round`.
    fn stimuli(&self, unit_ids: &[UnitId], round: usize) -> Stimuli {
        unit_ids
            .iter()
            .map(|uid| (uid.clone(), self.get(uid, round)))
            .collect()
    }
}

/// Same stimulus for every unit and round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantStimulus(pub f64);

impl StimulusSource for ConstantStimulus {
    fn get(&self, _unit_id: &str, _round: usize) -> f64 {
        self.0
    }
}

/// Closure-backed source for stimuli produced outside this crate.
pub struct ExternalStimulus<F> {
    source: F,
}

impl<F> ExternalStimulus<F>
where
    F: Fn(&str, usize) -> f64 + Send + Sync,
{
    pub fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F> StimulusSource for ExternalStimulus<F>
where
    F: Fn(&str, usize) -> f64 + Send + Sync,
{
    fn get(&self, unit_id: &str, round: usize) -> f64 {
        (self.source)(unit_id, round)
    }
}

/// How attackers choose which units to strike in a targeted round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetStrategy {
    /// Uniformly among the remaining candidates.
    Random,
    /// The unit with the highest weight.
    HighestWeight,
    /// The unit with the lowest attack threshold.
    LowestDefense,
    /// The unit with the lowest weight.
    Weakest,
}

/// How strengths are spread across units within an attack round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackMode {
    /// One strength per round, applied to every unit.
    Global,
    /// An independent strength for each unit.
    PerUnit,
    /// Up to `attacks_per_round` distinct units are struck, each with its
    /// own strength; every other unit sees 0.
    ///
    /// A unit struck at or above its threshold counts as compromised and
    /// is not picked again until every unit has been compromised, at
    /// which point the roster is assumed replaced and all units are
    /// candidates again.
    Targeted {
        strategy: TargetStrategy,
        attacks_per_round: usize,
    },
}

/// Generation parameters for an `AttackSequence`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackOptions {
    /// Lower bound of the uniform strength draw.
    /// Default: 0.1.
    pub min_strength: f64,

    /// Upper bound of the uniform strength draw.
    /// Default: 1.0.
    pub max_strength: f64,

    /// Default: `PerUnit`.
    pub mode: AttackMode,

    /// Chance that a round carries an attack at all. Quiet rounds give
    /// every unit strength 0.
    /// Default: 1.0.
    pub attack_probability: f64,
}

impl Default for AttackOptions {
    fn default() -> Self {
        Self {
            min_strength: 0.1,
            max_strength: 1.0,
            mode: AttackMode::PerUnit,
            attack_probability: 1.0,
        }
    }
}

impl AttackOptions {
    pub fn validate(&self) -> FusionResult<()> {
        for (name, value) in [
            ("min_strength", self.min_strength),
            ("max_strength", self.max_strength),
            ("attack_probability", self.attack_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FusionError::InvalidParameter(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.min_strength > self.max_strength {
            return Err(FusionError::InvalidParameter(format!(
                "min_strength {} exceeds max_strength {}",
                self.min_strength, self.max_strength
            )));
        }
        if let AttackMode::Targeted {
            attacks_per_round: 0,
            ..
        } = self.mode
        {
            return Err(FusionError::InvalidParameter(
                "attacks_per_round must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What an attacker knows about one unit when choosing targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub unit_id: UnitId,
    pub weight: f64,
    pub attack_threshold: f64,
}

impl TargetProfile {
    /// Profile of a default-provisioned unit.
    pub fn new(unit_id: impl Into<UnitId>) -> Self {
        let defaults = UnitConfig::default();
        Self {
            unit_id: unit_id.into(),
            weight: defaults.weight,
            attack_threshold: defaults.attack_threshold,
        }
    }

    /// Snapshot the roster of a running engine.
    pub fn from_status(status: &BTreeMap<UnitId, UnitStatus>) -> Vec<Self> {
        status
            .iter()
            .map(|(uid, s)| Self {
                unit_id: uid.clone(),
                weight: s.weight,
                attack_threshold: s.attack_threshold,
            })
            .collect()
    }
}

fn pick_target(
    strategy: TargetStrategy,
    candidates: &[usize],
    targets: &[TargetProfile],
    rng: &mut StdRng,
) -> Option<usize> {
    // `min_by` keeps the first of equal elements, so ties go to roster order.
    let lowest = |key: fn(&TargetProfile) -> f64| {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| key(&targets[a]).total_cmp(&key(&targets[b])))
    };
    match strategy {
        TargetStrategy::Random => candidates.choose(rng).copied(),
        TargetStrategy::HighestWeight => lowest(|t| -t.weight),
        TargetStrategy::LowestDefense => lowest(|t| t.attack_threshold),
        TargetStrategy::Weakest => lowest(|t| t.weight),
    }
}

/// Aggregate view of a pregenerated sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub total_rounds: usize,
    pub current_round: usize,
    pub remaining_rounds: usize,
    pub attack_rounds: usize,
    /// Statistics over drawn strengths only; 0 when nothing was drawn.
    pub avg_strength: f64,
    pub min_strength: f64,
    pub max_strength: f64,
    pub configured_min: f64,
    pub configured_max: f64,
    pub seed: u64,
}

/// Pregenerated, seeded table of per-round, per-unit strengths.
#[derive(Debug, Clone)]
pub struct AttackSequence {
    seed: u64,
    options: AttackOptions,
    rounds: Vec<Stimuli>,
    attacked: Vec<bool>,
    struck: Vec<Vec<UnitId>>,
    drawn: Vec<f64>,
    cursor: usize,
}

impl AttackSequence {
    /// Sequence over default-provisioned units.
    pub fn generate(
        seed: u64,
        num_rounds: usize,
        unit_ids: &[UnitId],
        options: AttackOptions,
    ) -> FusionResult<Self> {
        let targets: Vec<TargetProfile> = unit_ids.iter().map(TargetProfile::new).collect();
        Self::generate_for(seed, num_rounds, &targets, options)
    }

    /// Sequence over units with known weights and thresholds. Only
    /// `AttackMode::Targeted` looks at anything beyond the ids.
    pub fn generate_for(
        seed: u64,
        num_rounds: usize,
        targets: &[TargetProfile],
        options: AttackOptions,
    ) -> FusionResult<Self> {
        options.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut rounds = Vec::with_capacity(num_rounds);
        let mut attacked = Vec::with_capacity(num_rounds);
        let mut struck = Vec::with_capacity(num_rounds);
        let mut drawn = Vec::new();
        let mut compromised = vec![false; targets.len()];
        let range = options.min_strength..=options.max_strength;

        for _ in 0..num_rounds {
            let is_attack = rng.gen::<f64>() < options.attack_probability;
            let mut stimuli: Stimuli = targets
                .iter()
                .map(|t| (t.unit_id.clone(), 0.0))
                .collect();
            let mut hit: Vec<UnitId> = Vec::new();

            if is_attack {
                match options.mode {
                    AttackMode::Global => {
                        let strength = rng.gen_range(range.clone());
                        drawn.push(strength);
                        for t in targets {
                            stimuli.insert(t.unit_id.clone(), strength);
                            hit.push(t.unit_id.clone());
                        }
                    }
                    AttackMode::PerUnit => {
                        for t in targets {
                            let strength = rng.gen_range(range.clone());
                            drawn.push(strength);
                            stimuli.insert(t.unit_id.clone(), strength);
                            hit.push(t.unit_id.clone());
                        }
                    }
                    AttackMode::Targeted {
                        strategy,
                        attacks_per_round,
                    } => {
                        let mut hit_now = vec![false; targets.len()];
                        for _ in 0..attacks_per_round {
                            if !compromised.is_empty() && compromised.iter().all(|&c| c) {
                                log::debug!("every target compromised, assuming roster replacement");
                                compromised.fill(false);
                            }
                            let candidates: Vec<usize> = (0..targets.len())
                                .filter(|&i| !compromised[i] && !hit_now[i])
                                .collect();
                            let Some(idx) = pick_target(strategy, &candidates, targets, &mut rng)
                            else {
                                break;
                            };
                            let strength = rng.gen_range(range.clone());
                            drawn.push(strength);
                            hit_now[idx] = true;
                            if strength >= targets[idx].attack_threshold {
                                compromised[idx] = true;
                            }
                            stimuli.insert(targets[idx].unit_id.clone(), strength);
                            hit.push(targets[idx].unit_id.clone());
                        }
                    }
                }
            }

            rounds.push(stimuli);
            attacked.push(is_attack);
            struck.push(hit);
        }

        log::info!(
            "generated {num_rounds} rounds for {} units (seed={seed}, strength=[{:.2}, {:.2}], mode={:?})",
            targets.len(),
            options.min_strength,
            options.max_strength,
            options.mode
        );

        Ok(Self {
            seed,
            options,
            rounds,
            attacked,
            struck,
            drawn,
            cursor: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn options(&self) -> &AttackOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Stimuli of round `idx`, or `None` past the end.
    pub fn round(&self, idx: usize) -> Option<&Stimuli> {
        self.rounds.get(idx)
    }

    pub fn is_attack_round(&self, idx: usize) -> bool {
        self.attacked.get(idx).copied().unwrap_or(false)
    }

    /// Units struck in round `idx`, in strike order.
    pub fn struck(&self, idx: usize) -> &[UnitId] {
        self.struck.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Advance the cursor. `None` once the sequence is exhausted.
    pub fn next_round(&mut self) -> Option<&Stimuli> {
        let Some(stimuli) = self.rounds.get(self.cursor) else {
            log::warn!("attack sequence exhausted at round {}", self.cursor);
            return None;
        };
        self.cursor += 1;
        Some(stimuli)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn summary(&self) -> SequenceSummary {
        let (avg, min, max) = if self.drawn.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = self.drawn.iter().sum();
            let min = self.drawn.iter().copied().fold(f64::INFINITY, f64::min);
            let max = self.drawn.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (sum / self.drawn.len() as f64, min, max)
        };

        SequenceSummary {
            total_rounds: self.rounds.len(),
            current_round: self.cursor,
            remaining_rounds: self.rounds.len() - self.cursor,
            attack_rounds: self.attacked.iter().filter(|&&a| a).count(),
            avg_strength: avg,
            min_strength: min,
            max_strength: max,
            configured_min: self.options.min_strength,
            configured_max: self.options.max_strength,
            seed: self.seed,
        }
    }
}

impl StimulusSource for AttackSequence {
    /// Unknown units and rounds past the end see no attack.
    fn get(&self, unit_id: &str, round: usize) -> f64 {
        self.rounds
            .get(round)
            .and_then(|stimuli| stimuli.get(unit_id))
            .copied()
            .unwrap_or(0.0)
    }
}

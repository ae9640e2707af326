// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Simulation Harness
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Reproducible stimulus sources, a cooldown-aware round driver and a
//! side-by-side comparison runner for `FusionSystem` implementations.
//!
//! All randomness comes from an explicitly seeded `StdRng`; two runs
//! with the same seed see identical stimuli.

pub mod compare;
pub mod driver;
pub mod provision;
pub mod stimulus;

pub use compare::{compare, ComparisonEntry, ComparisonReport};
pub use driver::{RunStats, SimulationDriver};
pub use provision::{
    compute_weight, unit_config, ReliabilityCoefficients, ReliabilityProfile, ReliabilityRanges,
    WeightComponents,
};
pub use stimulus::{
    AttackMode, AttackOptions, AttackSequence, ConstantStimulus, ExternalStimulus,
    SequenceSummary, StimulusSource, TargetProfile, TargetStrategy,
};

// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Trust estimation, weighted-plurality judgement and roster scheduling
//! for a set of redundant execution units.
//!
//! # Invariants
//!
//! 1. **Weights stay bounded**: every unit weight lies in [0, 1] after
//!    any operation. Feedback multiplies by `1 ± decay` and clamps.
//!
//! 2. **Retired units never vote**: a soft-retired unit still produces
//!    output and still accumulates feedback, but the judge ignores it
//!    until `recovery_threshold` consecutive agreeing rounds bring it
//!    back. A single disagreement resets that count.
//!
//! 3. **Replacement is total**: a `SCHEDULED` verdict re-provisions the
//!    whole roster from each unit's own `UnitConfig`, restoring initial
//!    weight, a pristine trust window and the active state.
//!
//! 4. **The pending flag mirrors the last verdict**: `is_scheduled()` is
//!    true exactly when the last `judge()` returned `SCHEDULED`, until
//!    `recover()` clears it.

pub mod baseline;
pub mod dispersion;
pub mod engine;
pub mod feedback;
pub mod judge;
pub mod shared;
pub mod system;
pub mod trust;
pub mod unit;

pub use baseline::MajorityEngine;
pub use dispersion::dispersion;
pub use engine::FusionEngine;
pub use feedback::{replace_roster, FeedbackSummary, WeightUpdater};
pub use judge::FusionJudge;
pub use shared::SharedEngine;
pub use system::FusionSystem;
pub use trust::{beta_accuracy, TrustWindow};
pub use unit::{classify, ExecutionUnit, Roster, UnitState, UnitTransition};

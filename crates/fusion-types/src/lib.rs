// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Signal alphabet, configuration, status snapshots and the error
//! hierarchy shared by the fusion engine and its harnesses.

pub mod config;
pub mod error;
pub mod signal;
pub mod status;

pub use config::{FusionConfig, UnitConfig};
pub use error::{FusionError, FusionResult};
pub use signal::{clamp_bounded, Outputs, Signal, Stimuli, UnitId};
pub use status::{LabelTally, ScheduleTrigger, UnitStatus, Verdict};

// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Signal Alphabet
// ─────────────────────────────────────────────────────────────────────

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable execution unit identifier. Reused across roster replacement.
pub type UnitId = String;

/// One round's stimulus per unit id.
pub type Stimuli = BTreeMap<UnitId, f64>;

/// One round's output per unit id.
pub type Outputs = BTreeMap<UnitId, Signal>;

/// Categorical output of an execution unit or of the fusion judge.
///
/// Exactly one `Correct` value, severity-graded `Error` variants
/// (index 0 is the mildest), and the reserved `Scheduled` value that
/// only the judge emits to request a full-roster replacement.
///
/// The derived ordering (`Correct < Error(0) < Error(1) < … < Scheduled`)
/// is only used to make tie-breaks deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Signal {
    Correct,
    Error(usize),
    Scheduled,
}

impl Signal {
    pub fn is_correct(&self) -> bool {
        matches!(self, Signal::Correct)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Signal::Error(_))
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, Signal::Scheduled)
    }

    /// Severity index for error variants.
    pub fn severity(&self) -> Option<usize> {
        match self {
            Signal::Error(idx) => Some(*idx),
            _ => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Correct => write!(f, "CORRECT"),
            Signal::Error(idx) => write!(f, "ERROR#{idx}"),
            Signal::Scheduled => write!(f, "SCHEDULED"),
        }
    }
}

/// Clamp a value to [lo, hi]. NaN has no meaningful position and maps to
/// `lo`; infinities saturate like any other out-of-range value.
pub fn clamp_bounded(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("NaN clamped to lower bound {lo}");
        return lo;
    }
    value.clamp(lo, hi)
}

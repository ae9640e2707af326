// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all fusion kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FusionError {
    /// Judgement requested while no unit is active.
    ///
    /// The engine converts this into a `Scheduled` decision; it never
    /// surfaces as a panic.
    #[error("empty roster: no active execution units to judge")]
    EmptyRoster,

    /// A threshold, weight or count is outside its permitted range.
    /// Raised at construction / `add_unit` time only.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

pub type FusionResult<T> = Result<T, FusionError>;

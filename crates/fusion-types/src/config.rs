// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{FusionError, FusionResult};

fn check_unit_interval(name: &str, value: f64) -> FusionResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(FusionError::InvalidParameter(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// Provisioning parameters for a single execution unit.
///
/// A unit recreated by a roster replacement is rebuilt from the same
/// `UnitConfig` it was added with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    /// Initial voting weight in [0, 1].
    /// Default: 1.0.
    pub weight: f64,

    /// Classification boundary: stimuli at or above this are attacks.
    /// Default: 0.5.
    pub attack_threshold: f64,

    /// Consecutive disagreeing rounds that soft-retire an active unit.
    /// Default: 1 (any single disagreement retires the unit).
    pub error_threshold: u32,

    /// Consecutive agreeing rounds that bring a retired unit back.
    /// Default: 1.
    pub recovery_threshold: u32,

    /// Capacity of the correctness ring buffer.
    /// Default: 10.
    pub window_size: usize,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            weight: 1.0,
            attack_threshold: 0.5,
            error_threshold: 1,
            recovery_threshold: 1,
            window_size: 10,
        }
    }
}

impl UnitConfig {
    /// Default unit with the given classification boundary.
    pub fn with_attack_threshold(attack_threshold: f64) -> Self {
        Self {
            attack_threshold,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> FusionResult<()> {
        check_unit_interval("weight", self.weight)?;
        check_unit_interval("attack_threshold", self.attack_threshold)?;
        if self.error_threshold < 1 {
            return Err(FusionError::InvalidParameter(format!(
                "error_threshold must be >= 1, got {}",
                self.error_threshold
            )));
        }
        if self.recovery_threshold < 1 {
            return Err(FusionError::InvalidParameter(format!(
                "recovery_threshold must be >= 1, got {}",
                self.recovery_threshold
            )));
        }
        if self.window_size < 1 {
            return Err(FusionError::InvalidParameter(format!(
                "window_size must be >= 1, got {}",
                self.window_size
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> FusionResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FusionError::Config(format!("JSON parse error: {e}")))
    }
}

/// Engine-wide judgement and feedback parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Minimum average Beta accuracy for a label to be acted on, and the
    /// accuracy floor below which an active unit is soft-retired.
    /// Default: 0.5.
    pub trust_threshold: f64,

    /// Vote dispersion at or above which the roster is replaced.
    /// Default: 0.7.
    pub dispersion_threshold: f64,

    /// Multiplicative weight step applied after every round.
    /// Default: 0.1.
    pub decay: f64,

    /// Number of severity-graded error labels a unit can emit.
    /// Default: 1 (binary classification).
    pub error_variants: usize,

    /// Unit parameters used when `add_unit` is called without overrides.
    pub default_unit: UnitConfig,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            trust_threshold: 0.5,
            dispersion_threshold: 0.7,
            decay: 0.1,
            error_variants: 1,
            default_unit: UnitConfig::default(),
        }
    }
}

impl FusionConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> FusionResult<()> {
        check_unit_interval("trust_threshold", self.trust_threshold)?;
        check_unit_interval("dispersion_threshold", self.dispersion_threshold)?;
        if !(0.0..1.0).contains(&self.decay) {
            return Err(FusionError::InvalidParameter(format!(
                "decay must be in [0, 1), got {}",
                self.decay
            )));
        }
        if self.error_variants < 1 {
            return Err(FusionError::InvalidParameter(
                "error_variants must be >= 1".to_string(),
            ));
        }
        self.default_unit.validate()
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> FusionResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FusionError::Config(format!("JSON parse error: {e}")))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Reliability Provisioning
// ─────────────────────────────────────────────────────────────────────
//! Initial unit weights derived from reliability metadata.
//!
//! Each metric is min-max normalised against its fleet range (reversed
//! where lower is better), combined linearly into a score `S`, then
//! mapped through `(1 - e^{-κS}) / (1 - e^{-κ})`.

use serde::{Deserialize, Serialize};

use fusion_types::{clamp_bounded, FusionError, FusionResult, UnitConfig};

const NORM_EPSILON: f64 = 1e-8;

/// Reliability metadata of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityProfile {
    /// Mean time between failures (hours).
    pub mtbf: f64,
    /// Mean time to repair (minutes).
    pub mttr: f64,
    pub failure_rate: f64,
    /// Implementation diversity, already in [0, 1].
    pub heterogeneity: f64,
    /// Current load; higher means more shared dependencies.
    pub load: f64,
}

/// Fleet-wide `(min, max)` bounds used for normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityRanges {
    pub mtbf: (f64, f64),
    pub mttr: (f64, f64),
    pub failure_rate: (f64, f64),
    pub load: (f64, f64),
}

impl Default for ReliabilityRanges {
    fn default() -> Self {
        Self {
            mtbf: (50.0, 200.0),
            mttr: (5.0, 60.0),
            failure_rate: (0.01, 0.1),
            load: (0.3, 1.0),
        }
    }
}

impl ReliabilityRanges {
    pub fn validate(&self) -> FusionResult<()> {
        for (name, (lo, hi)) in [
            ("mtbf", self.mtbf),
            ("mttr", self.mttr),
            ("failure_rate", self.failure_rate),
            ("load", self.load),
        ] {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(FusionError::InvalidParameter(format!(
                    "{name} range must be finite with min <= max, got ({lo}, {hi})"
                )));
            }
        }
        Ok(())
    }
}

/// Linear mixing coefficients and curve shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityCoefficients {
    /// Default: 0.30.
    pub uptime: f64,
    /// Default: 0.20.
    pub repair: f64,
    /// Default: 0.10.
    pub failure: f64,
    /// Default: 0.25.
    pub heterogeneity: f64,
    /// Default: 0.15.
    pub load: f64,
    /// Curvature of the exponential mapping. Default: 2.0.
    pub kappa: f64,
}

impl Default for ReliabilityCoefficients {
    fn default() -> Self {
        Self {
            uptime: 0.30,
            repair: 0.20,
            failure: 0.10,
            heterogeneity: 0.25,
            load: 0.15,
            kappa: 2.0,
        }
    }
}

/// Intermediate values of a weight computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightComponents {
    pub r_up: f64,
    pub r_down: f64,
    pub f: f64,
    pub h: f64,
    pub c: f64,
    pub score: f64,
}

fn normalize(value: f64, (lo, hi): (f64, f64), reverse: bool) -> f64 {
    let norm = clamp_bounded((value - lo) / (hi - lo + NORM_EPSILON), 0.0, 1.0);
    if reverse {
        1.0 - norm
    } else {
        norm
    }
}

/// Map a reliability profile to an initial weight in [0, 1].
pub fn compute_weight(
    profile: &ReliabilityProfile,
    ranges: &ReliabilityRanges,
    coefficients: &ReliabilityCoefficients,
) -> FusionResult<(f64, WeightComponents)> {
    ranges.validate()?;
    if !(coefficients.kappa.is_finite() && coefficients.kappa > 0.0) {
        return Err(FusionError::InvalidParameter(format!(
            "kappa must be positive, got {}",
            coefficients.kappa
        )));
    }

    let r_up = normalize(profile.mtbf, ranges.mtbf, false);
    let r_down = normalize(profile.mttr, ranges.mttr, true);
    let f = normalize(profile.failure_rate, ranges.failure_rate, true);
    let h = clamp_bounded(profile.heterogeneity, 0.0, 1.0);
    let c = normalize(profile.load, ranges.load, true);

    let score = coefficients.uptime * r_up
        + coefficients.repair * r_down
        + coefficients.failure * f
        + coefficients.heterogeneity * h
        + coefficients.load * c;

    let kappa = coefficients.kappa;
    let weight = (1.0 - (-kappa * score).exp()) / (1.0 - (-kappa).exp());

    Ok((
        clamp_bounded(weight, 0.0, 1.0),
        WeightComponents {
            r_up,
            r_down,
            f,
            h,
            c,
            score,
        },
    ))
}

/// `base` with its initial weight replaced by the reliability-derived one.
pub fn unit_config(
    base: &UnitConfig,
    profile: &ReliabilityProfile,
    ranges: &ReliabilityRanges,
    coefficients: &ReliabilityCoefficients,
) -> FusionResult<UnitConfig> {
    let (weight, components) = compute_weight(profile, ranges, coefficients)?;
    log::debug!("reliability weight {weight:.3} from score {:.3}", components.score);
    let config = UnitConfig {
        weight,
        ..base.clone()
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_profile() -> ReliabilityProfile {
        ReliabilityProfile {
            mtbf: 120.0,
            mttr: 10.0,
            failure_rate: 0.02,
            heterogeneity: 0.8,
            load: 0.7,
        }
    }

    #[test]
    fn test_reference_profile() {
        let (w, c) = compute_weight(
            &reference_profile(),
            &ReliabilityRanges::default(),
            &ReliabilityCoefficients::default(),
        )
        .unwrap();
        assert!((c.r_up - 70.0 / 150.0).abs() < 1e-6);
        assert!((c.r_down - (1.0 - 5.0 / 55.0)).abs() < 1e-6);
        assert!((c.score - 0.675).abs() < 1e-3);
        assert!(w > 0.85 && w < 0.86, "got {w}");
    }

    #[test]
    fn test_extremes() {
        let ranges = ReliabilityRanges::default();
        let coeffs = ReliabilityCoefficients::default();
        let best = ReliabilityProfile {
            mtbf: 200.0,
            mttr: 5.0,
            failure_rate: 0.01,
            heterogeneity: 1.0,
            load: 0.3,
        };
        let worst = ReliabilityProfile {
            mtbf: 50.0,
            mttr: 60.0,
            failure_rate: 0.1,
            heterogeneity: 0.0,
            load: 1.0,
        };
        let (w_best, _) = compute_weight(&best, &ranges, &coeffs).unwrap();
        let (w_worst, _) = compute_weight(&worst, &ranges, &coeffs).unwrap();
        assert!(w_best > 0.999);
        assert!(w_worst < 1e-6);
    }

    #[test]
    fn test_out_of_range_metrics_clamped() {
        let profile = ReliabilityProfile {
            mtbf: 10_000.0,
            mttr: 0.0,
            failure_rate: 0.0,
            heterogeneity: 3.0,
            load: 0.0,
        };
        let (w, c) = compute_weight(
            &profile,
            &ReliabilityRanges::default(),
            &ReliabilityCoefficients::default(),
        )
        .unwrap();
        assert_eq!(c.r_up, 1.0);
        assert_eq!(c.h, 1.0);
        assert!(w <= 1.0);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let ranges = ReliabilityRanges {
            mtbf: (200.0, 50.0),
            ..ReliabilityRanges::default()
        };
        let result = compute_weight(
            &reference_profile(),
            &ranges,
            &ReliabilityCoefficients::default(),
        );
        assert!(matches!(result, Err(FusionError::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_kappa_rejected() {
        let coeffs = ReliabilityCoefficients {
            kappa: 0.0,
            ..ReliabilityCoefficients::default()
        };
        assert!(compute_weight(&reference_profile(), &ReliabilityRanges::default(), &coeffs)
            .is_err());
    }

    #[test]
    fn test_unit_config_keeps_thresholds() {
        let base = UnitConfig::with_attack_threshold(0.65);
        let config = unit_config(
            &base,
            &reference_profile(),
            &ReliabilityRanges::default(),
            &ReliabilityCoefficients::default(),
        )
        .unwrap();
        assert_eq!(config.attack_threshold, 0.65);
        assert!(config.weight < 1.0);
    }
}

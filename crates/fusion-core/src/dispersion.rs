// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Vote Dispersion Metric
// ─────────────────────────────────────────────────────────────────────
//! Normalised variance of per-label vote weight.
//!
//! For `n` labels with weight totals `w_i` and mean `m`:
//!
//! ```text
//! variance     = Σ (w_i - m)² / n
//! max_variance = m² · (n - 1)        (all mass on one label)
//! dispersion   = variance / max_variance
//! ```
//!
//! 0.0 means the mass is spread evenly across labels, 1.0 means it is
//! concentrated on one label while others carry none. A single label
//! (or none) has no dispersion.

/// Dispersion of a set of per-label weight totals, in [0, 1].
pub fn dispersion(label_weights: &[f64]) -> f64 {
    let n = label_weights.len();
    if n <= 1 {
        return 0.0;
    }
    let n_f = n as f64;
    let mean = label_weights.iter().sum::<f64>() / n_f;
    let variance = label_weights
        .iter()
        .map(|&w| (w - mean).powi(2))
        .sum::<f64>()
        / n_f;
    let max_variance = mean.powi(2) * (n_f - 1.0);
    if max_variance > 0.0 && max_variance.is_finite() {
        (variance / max_variance).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_label_zero() {
        assert_eq!(dispersion(&[]), 0.0);
        assert_eq!(dispersion(&[3.0]), 0.0);
    }

    #[test]
    fn test_even_split_zero() {
        assert!(dispersion(&[2.0, 2.0]).abs() < 1e-12);
        assert!(dispersion(&[1.0, 1.0, 1.0]).abs() < 1e-12);
    }

    #[test]
    fn test_two_label_closed_form() {
        // For two labels: ((a - b) / (a + b))²
        let d = dispersion(&[3.0, 2.0]);
        assert!((d - 0.04).abs() < 1e-12);
        let d = dispersion(&[4.0, 1.0]);
        assert!((d - 0.36).abs() < 1e-12);
    }

    #[test]
    fn test_fully_concentrated_is_one() {
        assert!((dispersion(&[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!((dispersion(&[2.0, 0.0, 0.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_mass() {
        assert_eq!(dispersion(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_range() {
        let samples: [&[f64]; 4] = [
            &[0.1, 0.9],
            &[0.3, 0.3, 0.9],
            &[1.0, 0.5, 0.25, 0.125],
            &[0.01, 5.0],
        ];
        for s in samples {
            let d = dispersion(s);
            assert!((0.0..=1.0).contains(&d), "{s:?} -> {d}");
        }
    }
}

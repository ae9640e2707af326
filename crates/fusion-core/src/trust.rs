// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Trust Estimator
// ─────────────────────────────────────────────────────────────────────
//! Bounded correctness history and Beta-Binomial accuracy estimate.
//!
//! The posterior mean uses a Laplace(+1, +1) prior:
//! `accuracy = (correct + 1) / (total + 2)`. It is monotone in the
//! empirical success rate, never reaches 0 or 1, and converges to the
//! raw frequency as the window grows.

use std::collections::VecDeque;

/// Fixed-capacity ring buffer of per-round correctness flags.
///
/// Seeded full of `true` so a freshly provisioned unit starts trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustWindow {
    results: VecDeque<bool>,
    capacity: usize,
}

impl TrustWindow {
    /// Create a window of `capacity` entries, all `true`.
    ///
    /// A zero capacity is raised to 1; `UnitConfig::validate` rejects it
    /// before it gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            results: std::iter::repeat(true).take(capacity).collect(),
            capacity,
        }
    }

    /// Append one round's outcome, evicting the oldest entry when full.
    pub fn record(&mut self, is_correct: bool) {
        self.results.push_back(is_correct);
        while self.results.len() > self.capacity {
            self.results.pop_front();
        }
    }

    pub fn correct(&self) -> usize {
        self.results.iter().filter(|&&r| r).count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when every entry is `true` (the freshly seeded state).
    pub fn is_pristine(&self) -> bool {
        self.results.len() == self.capacity && self.results.iter().all(|&r| r)
    }

    /// Oldest-to-newest view.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.results.iter().copied()
    }

    /// Beta posterior mean accuracy of this window.
    pub fn accuracy(&self) -> f64 {
        beta_accuracy(self.correct(), self.len())
    }
}

/// Beta(correct + 1, total - correct + 1) posterior mean.
#[inline]
pub fn beta_accuracy(correct: usize, total: usize) -> f64 {
    let correct = correct.min(total);
    let a = (correct + 1) as f64;
    let b = (total - correct + 1) as f64;
    a / (a + b)
}

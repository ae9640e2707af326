// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Property Tests
// ─────────────────────────────────────────────────────────────────────
//! Bounds and state-machine guarantees that must hold for any stimulus
//! sequence.

use fusion_core::{beta_accuracy, classify, ExecutionUnit, FusionEngine, FusionSystem, TrustWindow};
use fusion_types::{FusionConfig, Signal, Stimuli, UnitConfig};
use proptest::prelude::*;

// ── Strategies ─────────────────────────────────────────────────────

fn arb_config() -> impl Strategy<Value = FusionConfig> {
    (0.0..=1.0f64, 0.0..=1.0f64, 0.0..0.9f64, 1usize..5, 1u32..4, 1u32..4, 1usize..12).prop_map(
        |(trust, disp, decay, variants, err, rec, window)| FusionConfig {
            trust_threshold: trust,
            dispersion_threshold: disp,
            decay,
            error_variants: variants,
            default_unit: UnitConfig {
                error_threshold: err,
                recovery_threshold: rec,
                window_size: window,
                ..UnitConfig::default()
            },
        },
    )
}

fn arb_rounds(units: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-0.5..1.5f64, units), 1..40)
}

fn to_stimuli(values: &[f64]) -> Stimuli {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("unit_{i}"), *v))
        .collect()
}

// ── Engine-level properties ────────────────────────────────────────

proptest! {
    #[test]
    fn weights_stay_bounded_and_states_exclusive(
        config in arb_config(),
        thresholds in prop::collection::vec(0.0..=1.0f64, 1..8),
        rounds in arb_rounds(8),
    ) {
        let mut engine = FusionEngine::with_thresholds(config, &thresholds).unwrap();
        for values in &rounds {
            let fused = engine.step(&to_stimuli(values));
            prop_assert_eq!(engine.is_scheduled(), fused.is_scheduled());
            for status in engine.get_status().values() {
                prop_assert!((0.0..=1.0).contains(&status.weight));
                prop_assert_eq!(status.active, !status.soft_retired);
                prop_assert!(status.accuracy > 0.0 && status.accuracy < 1.0);
            }
        }
    }

    #[test]
    fn scheduled_count_matches_scheduled_rounds(
        thresholds in prop::collection::vec(0.0..=1.0f64, 1..6),
        rounds in arb_rounds(6),
    ) {
        let mut engine = FusionEngine::with_thresholds(FusionConfig::default(), &thresholds).unwrap();
        let mut expected = 0u64;
        for values in &rounds {
            if engine.step(&to_stimuli(values)).is_scheduled() {
                expected += 1;
            }
            engine.recover();
        }
        prop_assert_eq!(engine.scheduled_count(), expected);
    }
}

// ── Unit-level properties ──────────────────────────────────────────

proptest! {
    #[test]
    fn hysteresis_resets_on_single_miss(recovery in 2u32..10) {
        let config = UnitConfig { recovery_threshold: recovery, ..UnitConfig::default() };
        let mut unit = ExecutionUnit::new("u", config).unwrap();
        unit.record_result(false, Signal::Correct, 0.5);
        prop_assert!(unit.is_soft_retired());

        for _ in 0..recovery - 1 {
            unit.record_result(true, Signal::Correct, 0.5);
        }
        prop_assert!(unit.is_soft_retired());
        unit.record_result(false, Signal::Correct, 0.5);
        prop_assert!(unit.is_soft_retired());
        prop_assert_eq!(unit.consecutive_corrects(), 0);
    }

    #[test]
    fn clean_history_outranks_failed_history(len in 1usize..200) {
        prop_assert!(beta_accuracy(len, len) > beta_accuracy(0, len));

        let clean = TrustWindow::new(len);
        let mut failed = TrustWindow::new(len);
        for _ in 0..len {
            failed.record(false);
        }
        prop_assert!(clean.accuracy() > failed.accuracy());
    }

    #[test]
    fn classify_index_in_range(
        stimulus in prop::num::f64::ANY,
        threshold in 0.0..=1.0f64,
        variants in 1usize..16,
    ) {
        match classify(stimulus, threshold, variants) {
            Signal::Correct => prop_assert!(stimulus < threshold),
            Signal::Error(idx) => prop_assert!(idx < variants),
            Signal::Scheduled => prop_assert!(false, "units never emit SCHEDULED"),
        }
    }
}

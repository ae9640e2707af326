// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Round Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for one full fusion round at increasing roster
//! sizes, plus the judge and dispersion hot paths in isolation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fusion_core::{dispersion, FusionEngine, FusionJudge, FusionSystem, MajorityEngine};
use fusion_types::{FusionConfig, Stimuli};

fn thresholds(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.3 + 0.4 * i as f64 / n as f64).collect()
}

fn stimuli(n: usize, value: f64) -> Stimuli {
    (0..n).map(|i| (format!("unit_{i}"), value)).collect()
}

// ── FusionEngine.step() ─────────────────────────────────────────────

fn bench_step(c: &mut Criterion, n: usize) {
    let mut engine = FusionEngine::with_thresholds(FusionConfig::default(), &thresholds(n))
        .expect("valid thresholds");
    let input = stimuli(n, 0.45);
    c.bench_function(&format!("adaptive_step_{n}units"), |b| {
        b.iter(|| engine.step(black_box(&input)))
    });
}

fn bench_step_5_units(c: &mut Criterion) {
    bench_step(c, 5);
}

fn bench_step_50_units(c: &mut Criterion) {
    bench_step(c, 50);
}

fn bench_step_500_units(c: &mut Criterion) {
    bench_step(c, 500);
}

// ── MajorityEngine.step() ───────────────────────────────────────────

fn bench_majority_50_units(c: &mut Criterion) {
    let mut engine = MajorityEngine::with_thresholds(1, &thresholds(50)).expect("valid thresholds");
    let input = stimuli(50, 0.45);
    c.bench_function("majority_step_50units", |b| {
        b.iter(|| engine.step(black_box(&input)))
    });
}

// ── FusionJudge.evaluate() ──────────────────────────────────────────

fn bench_judge_50_units(c: &mut Criterion) {
    let config = FusionConfig {
        error_variants: 4,
        ..FusionConfig::default()
    };
    let mut engine =
        FusionEngine::with_thresholds(config.clone(), &thresholds(50)).expect("valid thresholds");
    engine.collect_outputs(&stimuli(50, 0.6));
    let judge = FusionJudge::from_config(&config);
    let outputs = engine.outputs().clone();
    let roster: fusion_core::Roster = engine
        .units()
        .map(|u| (u.unit_id().to_string(), u.clone()))
        .collect();
    c.bench_function("judge_evaluate_50units", |b| {
        b.iter(|| judge.evaluate(black_box(&outputs), black_box(&roster)))
    });
}

fn bench_dispersion(c: &mut Criterion) {
    let weights: Vec<f64> = (0..16).map(|i| 1.0 / (i as f64 + 1.0)).collect();
    c.bench_function("dispersion_16labels", |b| {
        b.iter(|| dispersion(black_box(&weights)))
    });
}

criterion_group!(
    benches,
    bench_step_5_units,
    bench_step_50_units,
    bench_step_500_units,
    bench_majority_50_units,
    bench_judge_50_units,
    bench_dispersion,
);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use qtty::Degrees;
use retrograde_rust::algorithms::{extract_retrograde_periods, retrograde_flags, RetrogradeExtractor};
use retrograde_rust::config::CalculatorConfig;
use retrograde_rust::core::domain::{ObservationPair, Sample};
use retrograde_rust::ephemeris::FnEphemeris;
use retrograde_rust::services::calculator::RetrogradeCalculator;

/// Daily longitudes with a retrograde loop roughly every 116 days.
fn synthetic_samples(days: usize) -> Vec<Sample> {
    (0..days)
        .map(|i| {
            let jd = 2433282.5 + i as f64;
            Sample::from_degrees(jd, looping_longitude(jd))
        })
        .collect()
}

fn looping_longitude(jd: f64) -> f64 {
    let phase = 2.0 * std::f64::consts::PI * jd / 116.0;
    (4.1 * jd - 100.0 * phase.sin()).rem_euclid(360.0)
}

fn bench_single_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_pass");

    for years in [1usize, 10, 100] {
        let samples = synthetic_samples(years * 365);
        group.bench_with_input(BenchmarkId::new("extract", years), &samples, |b, samples| {
            b.iter(|| extract_retrograde_periods(black_box(samples)));
        });
    }

    let longitudes: Vec<Degrees> = synthetic_samples(36500).iter().map(|s| s.longitude).collect();
    group.bench_function("flags_100y", |b| {
        b.iter(|| retrograde_flags(black_box(&longitudes)));
    });

    group.finish();
}

fn bench_windowed(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed");
    let samples = synthetic_samples(36500);

    for window_days in [365usize, 3650] {
        group.bench_with_input(
            BenchmarkId::new("push_window", window_days),
            &window_days,
            |b, &window_days| {
                b.iter(|| {
                    let mut extractor = RetrogradeExtractor::new();
                    let mut periods = Vec::new();
                    for window in samples.chunks(window_days) {
                        periods.extend(extractor.push_window(black_box(window)));
                    }
                    periods.extend(extractor.finish());
                    periods
                });
            },
        );
    }

    group.finish();
}

fn bench_calculator(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculator");
    group.sample_size(10);

    let provider = FnEphemeris::new("synthetic", |_pair: ObservationPair, jd: f64| {
        Some(looping_longitude(jd))
    });
    let config = CalculatorConfig::default();

    group.bench_function("default_run_1950_2050", |b| {
        b.iter(|| {
            let calculator = RetrogradeCalculator::new(black_box(&config), &provider)
                .expect("default configuration is valid");
            calculator.calculate_all().expect("synthetic provider never fails")
        });
    });

    group.finish();
}

criterion_group!(benches, bench_single_pass, bench_windowed, bench_calculator);
criterion_main!(benches);

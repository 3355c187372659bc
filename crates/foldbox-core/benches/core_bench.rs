//! Criterion benchmarks for foldbox-core primitives
//!
//! Run with: cargo bench -p foldbox-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use foldbox_core::{
    AllpassFilter, CombFilter, DcBlocker, Effect, InterpolatedDelay, Lfo, OnePole, OnePoleMode,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[48, 128, 512];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_one_pole(c: &mut Criterion) {
    let mut group = c.benchmark_group("OnePole");
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("highpass", block_size),
            &block_size,
            |b, _| {
                let mut hp = OnePole::with_mode(SAMPLE_RATE, 80.0, OnePoleMode::Highpass);
                b.iter(|| {
                    for &sample in &input {
                        black_box(hp.process(black_box(sample)));
                    }
                });
            },
        );
    }
    group.finish();
}

fn bench_ambience(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ambience");
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("comb_allpass", block_size),
            &block_size,
            |b, _| {
                let mut comb = CombFilter::new(SAMPLE_RATE, 1557);
                comb.set_feedback(0.7);
                comb.set_damping_hz(4000.0);
                let mut allpass = AllpassFilter::new(556);
                b.iter(|| {
                    for &sample in &input {
                        black_box(allpass.process(comb.process(black_box(sample))));
                    }
                });
            },
        );
    }
    group.finish();
}

fn bench_modulated_delay(c: &mut Criterion) {
    let input = generate_test_signal(512);
    c.bench_function("modulated_delay_512", |b| {
        let mut delay = InterpolatedDelay::from_time(SAMPLE_RATE, 0.03);
        let mut lfo = Lfo::new(SAMPLE_RATE, 0.8);
        let mut dc = DcBlocker::new(SAMPLE_RATE, 10.0);
        b.iter(|| {
            for &sample in &input {
                let d = 720.0 + 240.0 * lfo.next();
                black_box(dc.process(delay.read_write(black_box(sample), d)));
            }
        });
    });
}

criterion_group!(benches, bench_one_pole, bench_ambience, bench_modulated_delay);
criterion_main!(benches);

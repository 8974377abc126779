//! Benchmarks for fractional table lookup.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use plucky::dsp::{InterpolationMode, Interpolator};

use crate::BLOCK_SIZES;

pub fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/interpolate");

    let table: Vec<f32> = (0..1024)
        .map(|i| (i as f32 / 1024.0 * std::f32::consts::TAU).sin())
        .collect();

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size];

        for (name, mode) in [
            ("none", InterpolationMode::None),
            ("linear", InterpolationMode::Linear),
            ("lagrange2", InterpolationMode::Lagrange2),
            ("lagrange3", InterpolationMode::Lagrange3),
        ] {
            let interp = Interpolator::new(mode);
            // Irrational step so every lookup lands between samples
            let step = 7.318_f64;

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for (i, sample) in output.iter_mut().enumerate() {
                        *sample = interp.interpolate(black_box(&table), i as f64 * step);
                    }
                    black_box(&output);
                })
            });
        }
    }

    group.finish();
}

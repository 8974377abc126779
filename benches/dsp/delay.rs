//! Benchmarks for the circular delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use plucky::dsp::{delay::DelayLine, noise::GaussianNoise};

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size];

        // One Karplus-Strong pass per sample: read, average, write, advance
        let mut line = DelayLine::new(65_536);
        line.set_length(100);
        let mut noise = GaussianNoise::new(1);
        line.fill_from_read(100, |_| noise.next_sample());

        group.bench_with_input(BenchmarkId::new("averaging_loop", size), &size, |b, _| {
            b.iter(|| {
                for sample in output.iter_mut() {
                    let current = line.read();
                    line.write((current * 0.99 + line.previous_write()) * 0.5);
                    *sample = current;
                    line.advance();
                }
                black_box(&output);
            })
        });

        // Excitation cost is per note, measured against a block-sized loop
        let mut line = DelayLine::new(65_536);
        line.set_length(size);
        let mut noise = GaussianNoise::new(2);

        group.bench_with_input(BenchmarkId::new("excite", size), &size, |b, &size| {
            b.iter(|| {
                line.fill_from_read(black_box(size), |_| noise.next_sample());
            })
        });
    }

    group.finish();
}

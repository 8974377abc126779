//! Benchmarks for polyphonic plucked strings.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use plucky::{
    graph::node::{RenderCtx, RenderUnit},
    synth::{PolySynth, Voice},
    voices::Karplus,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn string(index: usize) -> Karplus {
    Karplus::new(SAMPLE_RATE, 0.01).with_seed(index as u64 + 1)
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::new(SAMPLE_RATE, 0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === SINGLE STRING ===
        // Baseline for what one voice costs
        let mut single = string(0);
        single.note_on(45, 100);

        group.bench_with_input(BenchmarkId::new("karplus", size), &size, |b, _| {
            b.iter(|| single.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // === CHORD ===
        // 8-voice pool, 4 held notes: idle voices still render
        let mut chord = PolySynth::with_factory(8, string);
        for note in [48, 52, 55, 60] {
            chord.note_on(note, 100);
        }

        // Advance the clock every iteration so the voice caches never hit
        let mut clock = 0u64;
        group.bench_with_input(BenchmarkId::new("poly_chord", size), &size, |b, &size| {
            b.iter(|| {
                let ctx = RenderCtx::new(SAMPLE_RATE, clock);
                chord.render(black_box(&mut buffer), &ctx);
                clock += size as u64;
            })
        });

        // === SATURATED POOL ===
        // Every block steals: 4 voices, a new note each time
        let mut busy = PolySynth::with_factory(4, string);
        let mut note = 40u8;
        let mut clock = 0u64;
        group.bench_with_input(BenchmarkId::new("poly_stealing", size), &size, |b, &size| {
            b.iter(|| {
                busy.note_on(note, 90);
                note = if note >= 80 { 40 } else { note + 1 };
                let ctx = RenderCtx::new(SAMPLE_RATE, clock);
                busy.render(black_box(&mut buffer), &ctx);
                clock += size as u64;
            })
        });
    }

    group.finish();
}

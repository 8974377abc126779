//! Benchmarks for the mixing server callback.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use plucky::{
    graph::{extensions::UnitExt, source::NoiseSource},
    synth::PolySynth,
    voices::Karplus,
    EngineConfig, MixServer,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");

    for &size in BLOCK_SIZES {
        let config = EngineConfig::default()
            .with_sample_rate(SAMPLE_RATE)
            .with_output_channels(2);

        // === STEREO BAND ===
        // Two string pools panned hard, plus a quiet noise bed on both sides
        let server = MixServer::new(config).expect("valid config");
        for channel in 0..2 {
            let mut strings = PolySynth::with_factory(6, |i: usize| {
                Karplus::new(SAMPLE_RATE, 0.01).with_seed((channel * 10 + i) as u64)
            });
            strings.note_on(48 + channel as u8 * 7, 100);
            strings.note_on(55 + channel as u8 * 7, 100);
            let id = server.insert(strings);
            server.add_client(id, channel);
        }
        let bed = server.insert(NoiseSource::new(1.0, 99).scaled(0.02));
        server.add_client(bed, 0);
        server.add_client(bed, 1);

        let mut output = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("stereo_band", size), &size, |b, &size| {
            b.iter(|| server.callback(&[], black_box(&mut output), size))
        });

        // === INTERLEAVED ===
        // Same graph through the driver-facing interleaved path
        group.bench_with_input(BenchmarkId::new("interleaved", size), &size, |b, _| {
            b.iter(|| server.callback_interleaved(&[], black_box(&mut output)))
        });
    }

    group.finish();
}

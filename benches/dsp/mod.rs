//! Benchmarks for low-level DSP primitives.

mod delay;
mod interpolate;

pub use delay::bench_delay;
pub use interpolate::bench_interpolate;

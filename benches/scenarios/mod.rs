//! Real-world scenario benchmarks.
//!
//! These benchmarks model actual usage patterns: a pool of plucked strings
//! under a chord, and a server mixing several channels per callback.

mod mix;
mod voices;

pub use mix::bench_mix;
pub use voices::bench_voices;

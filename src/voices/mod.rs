//! Ready-made voices for [`PolySynth`](crate::synth::PolySynth).
//!
//! # Example
//!
//! ```
//! use plucky::{synth::PolySynth, voices::Karplus};
//!
//! let mut synth = PolySynth::with_factory(8, |i: usize| {
//!     Karplus::new(44_100.0, 0.01).with_seed(i as u64 + 1)
//! });
//! synth.note_on(60, 100);
//! ```

pub mod pluck;

pub use pluck::Karplus;

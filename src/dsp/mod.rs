//! Low-level DSP primitives used by the render units.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside voice structs. They stay focused
//! on the signal-processing math so the graph layer can handle caching and
//! routing.

/// Power-of-two circular delay line.
pub mod delay;
/// Fractional table lookup (none, linear, Lagrange).
pub mod interpolate;
/// Seeded Gaussian noise for excitation.
pub mod noise;

pub use interpolate::{InterpolationMode, Interpolator};

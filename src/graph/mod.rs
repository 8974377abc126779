//! Render units and the per-block cache contract.
//!
//! Every audio producer implements [`RenderUnit`]. Consumers never call
//! `render` directly; they go through [`Cached`], which renders at most once
//! per value of the server's sample clock. The `extensions` module adds fluent
//! helpers so small patches read as a chain.

/// Multiply two signals, or a signal by a smoothed constant.
pub mod amplify;
/// Fluent combinators (`.cached()`, `.shared()`, `.scaled()`, etc.).
pub mod extensions;
/// Unweighted sum of several inputs plus an offset.
pub mod mix;
/// Core trait, render context and cache wrappers.
pub mod node;
/// Table-driven waveshaping.
pub mod shaper;
/// Constant, noise and driver-input sources.
pub mod source;

pub use node::{Cached, RenderCtx, RenderUnit, Shared};

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::MAX_BLOCK_SIZE;

/*
Render and Cache Contract
=========================

Every audio-producing unit implements one method, `render`, which fills a
block with fresh samples. Nobody outside the unit calls `render` directly:
consumers go through `Cached::process`, which remembers the last block and the
sample clock it was rendered at.

    process(out, ctx)
        │
        ├─ no cache yet, or out.len() changed ──→ render, stamp clock
        ├─ stamp != ctx.clock ──────────────────→ render, stamp clock
        └─ stamp == ctx.clock ──────────────────→ reuse cache
        │
        └─ copy cache into out

The clock is the mix server's running frame count, not wall time. It advances
once per callback, so a unit feeding several consumers (two channels, a shared
modulator) renders once per block and every consumer sees identical samples.

`render` must not call back into its own `Cached` wrapper.
*/

/// Context handed to every unit during a render pass.
///
/// - `sample_rate`: audio sample rate in Hz
/// - `clock`: frames processed by the server before this block
/// - input: planar snapshot of the driver's input for this block
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx<'a> {
    pub sample_rate: f32,
    pub clock: u64,
    input: &'a [f32],
    input_channels: usize,
}

impl<'a> RenderCtx<'a> {
    /// Context with no driver input attached.
    pub fn new(sample_rate: f32, clock: u64) -> Self {
        Self {
            sample_rate,
            clock,
            input: &[],
            input_channels: 0,
        }
    }

    /// Attach planar input: `channels` consecutive runs of equal length.
    pub fn with_input(mut self, input: &'a [f32], channels: usize) -> Self {
        self.input = input;
        self.input_channels = channels;
        self
    }

    /// One channel of this block's input, if the driver provided it.
    pub fn input(&self, channel: usize) -> Option<&'a [f32]> {
        if channel >= self.input_channels || self.input.is_empty() {
            return None;
        }
        let input: &'a [f32] = self.input;
        let frames = input.len() / self.input_channels;
        input.get(channel * frames..(channel + 1) * frames)
    }
}

/// Core trait for anything that produces audio.
pub trait RenderUnit: Send {
    /// Fill `out` with `out.len()` fresh samples.
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx);
}

impl RenderUnit for Box<dyn RenderUnit> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render(out, ctx)
    }
}

/// Wraps a unit with the per-clock render cache.
pub struct Cached<U> {
    unit: U,
    cache: Vec<f32>,
    stamp: Option<u64>,
}

impl<U: RenderUnit> Cached<U> {
    pub fn new(unit: U) -> Self {
        Self::with_capacity(unit, MAX_BLOCK_SIZE)
    }

    /// Reserve room for blocks of up to `frames` so resizing never allocates.
    pub fn with_capacity(unit: U, frames: usize) -> Self {
        Self {
            unit,
            cache: Vec::with_capacity(frames),
            stamp: None,
        }
    }

    /// The only entry point consumers should use.
    pub fn process(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frames = out.len();
        let stale = match self.stamp {
            Some(stamp) => stamp != ctx.clock || self.cache.len() != frames,
            None => true,
        };

        if stale {
            self.cache.clear();
            self.cache.resize(frames, 0.0);
            self.unit.render(&mut self.cache, ctx);
            self.stamp = Some(ctx.clock);
        }

        out.copy_from_slice(&self.cache);
    }

    /// Clock value of the cached block, `None` before the first render.
    pub fn stamp(&self) -> Option<u64> {
        self.stamp
    }

    /// Forget the cached block so the next `process` renders.
    pub fn invalidate(&mut self) {
        self.stamp = None;
    }

    pub fn get(&self) -> &U {
        &self.unit
    }

    pub fn get_mut(&mut self) -> &mut U {
        &mut self.unit
    }

    pub fn into_inner(self) -> U {
        self.unit
    }
}

/// Cached unit shared between several consumers.
///
/// Clones point at the same unit and cache; whichever consumer asks first in
/// a block triggers the render, the rest copy. Rendering never waits on the
/// lock: if another thread holds it, that consumer gets silence for the
/// block. Use [`Shared::lock`] for setup and inspection, not to feed events
/// to a playing unit; queue those instead.
pub struct Shared<U> {
    inner: Arc<Mutex<Cached<U>>>,
}

impl<U: RenderUnit> Shared<U> {
    pub fn new(unit: U) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Cached::new(unit))),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Cached<U>> {
        self.inner.lock()
    }
}

impl<U> Clone for Shared<U> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<U: RenderUnit> RenderUnit for Shared<U> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        match self.inner.try_lock() {
            Some(mut cached) => cached.process(out, ctx),
            None => out.fill(0.0),
        }
    }
}

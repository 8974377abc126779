use crate::{
    graph::{
        node::{RenderCtx, RenderUnit},
        source::Silence,
    },
    MAX_BLOCK_SIZE,
};

/*
Signal Multiplication
=====================

Multiply renders a signal and multiplies it, sample by sample, either by a
second signal (ring/amplitude modulation) or by a constant gain.

  signal × modulator      both present
  signal × gain           no modulator: gain is a constant, smoothed with a
                          one-pole lowpass so changing it never clicks
  silence                 no signal at all

Missing inputs are not an error. A multiplier with nothing to multiply
outputs silence, and one without a modulator falls back to the constant.

Gain smoothing, per sample:

    smoothed = 0.01 × target + 0.99 × smoothed
*/

const SMOOTHING: f32 = 0.01;

pub struct Multiply<A, B> {
    signal: Option<A>,
    modulator: Option<B>,
    target: f32,
    smoothed: f32,
    temp_buffer: Vec<f32>,
}

impl<A, B> Multiply<A, B> {
    pub fn new(signal: A, modulator: B) -> Self {
        Self {
            signal: Some(signal),
            modulator: Some(modulator),
            target: 1.0,
            smoothed: 1.0,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn set_signal(&mut self, signal: Option<A>) {
        self.signal = signal;
    }

    pub fn set_modulator(&mut self, modulator: Option<B>) {
        self.modulator = modulator;
    }

    /// Target gain used while no modulator is connected.
    pub fn set_value(&mut self, value: f32) {
        self.target = value;
    }
}

impl<A> Multiply<A, Silence> {
    /// Multiply by a constant gain only.
    pub fn by_constant(signal: A, value: f32) -> Self {
        Self {
            signal: Some(signal),
            modulator: None,
            target: value,
            smoothed: value,
            temp_buffer: Vec::new(),
        }
    }
}

impl<A: RenderUnit, B: RenderUnit> RenderUnit for Multiply<A, B> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let Some(signal) = self.signal.as_mut() else {
            out.fill(0.0);
            return;
        };
        signal.render(out, ctx);

        if let Some(modulator) = self.modulator.as_mut() {
            // Only grows for blocks beyond MAX_BLOCK_SIZE or after set_modulator
            if self.temp_buffer.len() < out.len() {
                self.temp_buffer.resize(out.len(), 0.0);
            }
            let frames = &mut self.temp_buffer[..out.len()];
            modulator.render(frames, ctx);
            for (o, m) in out.iter_mut().zip(frames.iter()) {
                *o *= *m;
            }
        } else {
            for o in out.iter_mut() {
                self.smoothed = SMOOTHING * self.target + (1.0 - SMOOTHING) * self.smoothed;
                *o *= self.smoothed;
            }
        }
    }
}

//! Leaf units: constants, noise, and driver input.

use crate::{
    dsp::noise::GaussianNoise,
    graph::node::{RenderCtx, RenderUnit},
};

/// Emits the same value on every sample.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub f32);

impl RenderUnit for Constant {
    fn render(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        out.fill(self.0);
    }
}

/// Always zero. Stands in for an input that is not connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl RenderUnit for Silence {
    fn render(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        out.fill(0.0);
    }
}

/// Gaussian white noise scaled by `gain`.
pub struct NoiseSource {
    noise: GaussianNoise,
    pub gain: f32,
}

impl NoiseSource {
    pub fn new(gain: f32, seed: u64) -> Self {
        Self {
            noise: GaussianNoise::new(seed),
            gain,
        }
    }
}

impl RenderUnit for NoiseSource {
    fn render(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.noise.next_sample() * self.gain;
        }
    }
}

/// One channel of the server's input for the current block.
///
/// Renders silence when the driver supplied no input for that channel.
#[derive(Debug, Clone, Copy)]
pub struct InputSource {
    pub channel: usize,
}

impl InputSource {
    pub fn new(channel: usize) -> Self {
        Self { channel }
    }
}

impl RenderUnit for InputSource {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        match ctx.input(self.channel) {
            Some(input) if input.len() >= out.len() => {
                out.copy_from_slice(&input[..out.len()]);
            }
            _ => out.fill(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_respects_gain() {
        let mut noise = NoiseSource::new(0.25, 3);
        let mut buffer = vec![0.0; 4096];
        noise.render(&mut buffer, &RenderCtx::new(48_000.0, 0));

        assert!(buffer.iter().any(|&s| s != 0.0));
        assert!(buffer.iter().all(|&s| s.abs() < 0.25));
    }

    #[test]
    fn input_source_reads_its_channel() {
        let input = [0.1, 0.1, 0.1, 0.1, -0.2, -0.2, -0.2, -0.2];
        let ctx = RenderCtx::new(48_000.0, 0).with_input(&input, 2);

        let mut buffer = vec![0.0; 4];
        InputSource::new(1).render(&mut buffer, &ctx);
        assert_eq!(buffer, vec![-0.2; 4]);
    }

    #[test]
    fn input_source_without_input_is_silent() {
        let mut buffer = vec![1.0; 8];
        InputSource::new(0).render(&mut buffer, &RenderCtx::new(48_000.0, 0));
        assert!(buffer.iter().all(|&s| s == 0.0));
    }
}

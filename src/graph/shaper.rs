use crate::{
    dsp::interpolate::{InterpolationMode, Interpolator},
    graph::node::{RenderCtx, RenderUnit},
};

/*
Waveshaping
===========

Waveshaper renders its input and maps every sample through a transfer
table. The input range [-1, 1] is spread across the whole table:

    index = (x * 0.5 + 0.5) * (len - 1)

  x = -1  → table[0]
  x =  0  → middle of the table
  x =  1  → table[len - 1]

Inputs outside [-1, 1] are clamped first, so a hot signal holds at the table
ends instead of wrapping around to the other side. Fractional indices are
read with the shaper's interpolator (linear unless changed).

An empty table outputs silence.
*/

pub struct Waveshaper<U> {
    input: U,
    table: Vec<f32>,
    interpolator: Interpolator,
}

impl<U> Waveshaper<U> {
    pub fn new(input: U, table: &[f32]) -> Self {
        Self {
            input,
            table: table.to_vec(),
            interpolator: Interpolator::new(InterpolationMode::Linear),
        }
    }

    /// Replace the transfer table. Allocates; call it off the audio thread.
    pub fn set_table(&mut self, table: &[f32]) {
        self.table.clear();
        self.table.extend_from_slice(table);
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }

    pub fn set_mode(&mut self, mode: InterpolationMode) {
        self.interpolator.set_mode(mode);
    }
}

impl<U: RenderUnit> RenderUnit for Waveshaper<U> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.input.render(out, ctx);

        let span = self.table.len().saturating_sub(1) as f64;
        for sample in out.iter_mut() {
            let x = (*sample).clamp(-1.0, 1.0) as f64;
            let index = (x * 0.5 + 0.5) * span;
            *sample = self.interpolator.interpolate(&self.table, index);
        }
    }
}

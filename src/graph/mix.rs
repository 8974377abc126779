use crate::{
    graph::node::{RenderCtx, RenderUnit},
    MAX_BLOCK_SIZE,
};

/*
Signal Summing
==============

Sum renders each of its inputs and adds them together, then adds a constant
offset:

    output = input_0 + input_1 + ... + input_n + offset

There is no weighting and no limiting. Summing several full-scale signals
goes past [-1, 1]; keeping levels sane is the patch author's job. With no
inputs the output is just the offset (0.0 by default).

A DC offset is handy when the sum drives a parameter rather than a speaker:
an LFO in [-1, 1] plus an offset of 1.0 becomes a gain in [0, 2].

Inputs are owned. To feed the same unit into a Sum and somewhere else, wrap
it in `Shared` so it still renders once per block.
*/

pub struct Sum<U> {
    inputs: Vec<U>,
    pub offset: f32,
    temp_buffer: Vec<f32>,
}

impl<U> Sum<U> {
    pub fn new(offset: f32) -> Self {
        Self {
            inputs: Vec::new(),
            offset,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn add_input(&mut self, input: U) {
        self.inputs.push(input);
    }

    /// Detach and return the input at `index`.
    pub fn remove_input(&mut self, index: usize) -> Option<U> {
        (index < self.inputs.len()).then(|| self.inputs.remove(index))
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl<U> FromIterator<U> for Sum<U> {
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        let mut sum = Self::new(0.0);
        sum.inputs.extend(iter);
        sum
    }
}

impl<U: RenderUnit> RenderUnit for Sum<U> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(self.offset);

        if self.temp_buffer.len() < out.len() {
            self.temp_buffer.resize(out.len(), 0.0);
        }
        let frames = &mut self.temp_buffer[..out.len()];

        for input in &mut self.inputs {
            input.render(frames, ctx);
            for (o, s) in out.iter_mut().zip(frames.iter()) {
                *o += *s;
            }
        }
    }
}

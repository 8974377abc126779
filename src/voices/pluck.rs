//! Karplus-Strong plucked string.
//!
//! A noise burst circulates through a delay line whose length is one period
//! of the note. Each pass averages neighbouring samples, a gentle lowpass, so
//! high harmonics die first and the burst settles into a decaying pitched
//! tone, much like a real string.
//!
//! # How It Works
//!
//! 1. Note-on sets the loop length to `sample_rate / frequency` samples
//! 2. The loop is filled with tanh-shaped Gaussian noise (the pluck)
//! 3. Every sample, the value at the read cursor is scaled by the feedback,
//!    averaged with the previously written sample and stored at the write
//!    cursor
//! 4. Output is the read-cursor sample before the write, times the gain
//! 5. Note-off drops the feedback so the string damps quickly
//!
//! # Variations
//!
//! - Feedback closer to 1.0 = longer sustain
//! - `note_on_with_excitation` = pluck with a recorded or synthesized
//!   transient instead of pure noise

use tracing::trace;

use crate::{
    dsp::{
        delay::DelayLine,
        interpolate::{InterpolationMode, Interpolator},
        noise::GaussianNoise,
    },
    graph::node::{RenderCtx, RenderUnit},
    io::converter::midi_note_to_freq,
    synth::voice::{Voice, VoiceState},
};

/// Delay line capacity in samples. Must stay a power of two.
pub const MAX_LOOP_SAMPLES: usize = 65_536;

const SUSTAIN_FEEDBACK: f32 = 0.99;
const RELEASE_FEEDBACK: f32 = 0.5;
const DEFAULT_FEEDBACK: f32 = 0.8;

/// Level of the noise mixed into an external excitation.
const EXCITATION_NOISE: f32 = 0.05;

/// Render budget for the done predicate, in loop lengths.
const LOOPS_UNTIL_DONE: usize = 100;

pub struct Karplus {
    line: DelayLine,
    noise: GaussianNoise,
    resampler: Interpolator,
    state: VoiceState,
    sample_rate: f32,
    length: usize,
    feedback: f32,
    gain: f32,
}

impl Karplus {
    /// A string whose idle loop lasts `time` seconds.
    pub fn new(sample_rate: f32, time: f32) -> Self {
        let mut voice = Self {
            line: DelayLine::new(MAX_LOOP_SAMPLES),
            noise: GaussianNoise::new(0x5EED),
            resampler: Interpolator::new(InterpolationMode::Linear),
            state: VoiceState::default(),
            sample_rate,
            length: 0,
            feedback: DEFAULT_FEEDBACK,
            gain: 1.0,
        };
        voice.set_time(time);
        voice
    }

    /// Reseed the excitation noise so pooled strings don't pluck identically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.noise = GaussianNoise::new(seed);
        self
    }

    pub fn set_time(&mut self, time: f32) {
        self.set_length((self.sample_rate * time) as usize);
    }

    /// Loop length in samples. Panics if it exceeds [`MAX_LOOP_SAMPLES`].
    pub fn set_length(&mut self, length: usize) {
        self.line.set_length(length);
        self.length = length;
        self.state.set_max(length * LOOPS_UNTIL_DONE);
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Replace the active loop with fresh noise.
    pub fn excite(&mut self) {
        let noise = &mut self.noise;
        self.line.fill_from_read(self.length, |_| noise.next_sample());
    }

    /// Add an external excitation to the loop.
    ///
    /// `excitation` is stretched or squeezed to the loop length with linear
    /// interpolation, blended with a little noise, and scaled down by the
    /// loop's current peak so re-plucking a ringing string doesn't blow up.
    pub fn excite_with(&mut self, excitation: &[f32]) {
        if excitation.is_empty() || self.length == 0 {
            return;
        }

        let scale = 1.0 / (1.0 + self.line.peak());
        let step = excitation.len() as f64 / self.length as f64;

        for i in 0..self.length {
            let shaped = self.resampler.interpolate(excitation, i as f64 * step);
            let blended = shaped + EXCITATION_NOISE * self.noise.next_sample();
            let existing = self.line.peek(i);
            self.line.poke(i, existing + blended * scale);
        }
    }

    /// Note-on that plucks with `excitation` instead of pure noise.
    pub fn note_on_with_excitation(&mut self, note: u8, velocity: u8, excitation: &[f32]) {
        self.start(note, velocity);
        self.excite_with(excitation);
    }

    fn start(&mut self, note: u8, velocity: u8) {
        self.state.start();

        let frequency = midi_note_to_freq(note);
        let length = (self.sample_rate / frequency).round() as usize;
        trace!(note, frequency, length, "pluck");

        self.set_length(length);
        self.feedback = SUSTAIN_FEEDBACK;
        self.gain = velocity as f32 / 127.0;
    }
}

impl RenderUnit for Karplus {
    fn render(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            let current = self.line.read();
            let filtered = (current * self.feedback + self.line.previous_write()) * 0.5;
            self.line.write(filtered);
            *sample = current * self.gain;
            self.line.advance();
        }
        self.state.advance(out.len());
    }
}

impl Voice for Karplus {
    fn note_on(&mut self, note: u8, velocity: u8) {
        self.start(note, velocity);
        self.excite();
    }

    fn note_off(&mut self) {
        self.state.stop();
        self.feedback = RELEASE_FEEDBACK;
    }

    fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Takes effect on the next note-on; a ringing loop keeps its length.
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    fn is_done(&self) -> bool {
        self.state.is_done()
    }
}

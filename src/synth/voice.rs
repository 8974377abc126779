use crate::graph::node::{RenderCtx, RenderUnit};

/// Playing flag and rendered-sample budget shared by voice implementations.
///
/// `playing` follows note-on/note-off. `rendered` counts samples since the
/// last note-on and is compared against `max` by [`VoiceState::is_done`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceState {
    playing: bool,
    rendered: usize,
    max: usize,
}

impl VoiceState {
    pub fn start(&mut self) {
        self.playing = true;
        self.rendered = 0;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Record `frames` rendered samples.
    pub fn advance(&mut self, frames: usize) {
        self.rendered = self.rendered.saturating_add(frames);
    }

    pub fn set_max(&mut self, max: usize) {
        self.max = max;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn is_done(&self) -> bool {
        self.rendered >= self.max
    }
}

/// A render unit that can be played polyphonically.
///
/// Note events arrive as plain MIDI numbers; the voice decides what pitch
/// and level they mean. After `note_off` the voice keeps rendering whatever
/// tail it has, so the allocator never has to wait for it.
pub trait Voice: RenderUnit {
    fn note_on(&mut self, note: u8, velocity: u8);

    fn note_off(&mut self);

    fn is_playing(&self) -> bool;

    /// Rate used to turn the next note into samples. Voices with no
    /// rate-dependent state can ignore it.
    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    /// Advisory: the voice has used up its render budget. The allocator still
    /// renders done voices.
    fn is_done(&self) -> bool {
        false
    }
}

impl RenderUnit for Box<dyn Voice> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render(out, ctx)
    }
}

/// Allow boxed voices so one pool can hold different instruments.
impl Voice for Box<dyn Voice> {
    fn note_on(&mut self, note: u8, velocity: u8) {
        (**self).note_on(note, velocity)
    }

    fn note_off(&mut self) {
        (**self).note_off()
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        (**self).set_sample_rate(sample_rate)
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_resets_counter() {
        let mut state = VoiceState::default();
        state.set_max(100);
        state.start();
        state.advance(64);
        assert_eq!(state.rendered(), 64);

        state.stop();
        assert!(!state.is_playing());

        state.start();
        assert!(state.is_playing());
        assert_eq!(state.rendered(), 0);
    }

    #[test]
    fn done_once_budget_is_spent() {
        let mut state = VoiceState::default();
        state.set_max(128);
        state.start();

        state.advance(127);
        assert!(!state.is_done());
        state.advance(1);
        assert!(state.is_done());
    }
}

use std::collections::VecDeque;

use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::{
    graph::node::{Cached, RenderCtx, RenderUnit},
    synth::{
        factory::VoiceFactory,
        message::{MessageReceiver, SynthMessage},
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/*
Voice Allocation
================

PolySynth owns a fixed pool of voices and a table from MIDI note to the voice
sounding it. The pool is kept in a queue whose order is the priority order:
the front is the voice that was (re)assigned longest ago, the back the most
recent.

Per note the life cycle is just idle → sounding → idle. Any release tail
belongs to the voice itself.

note_on(n):
  1. n already bound          → re-trigger that voice, queue order unchanged
  2. a voice is not playing   → take the first one in queue order
  3. every voice is playing   → steal the front of the queue (oldest)
  then: unbind whatever note the chosen voice had, bind n to it, trigger it,
        move it to the back of the queue

note_off(n):
  bound → release the voice and unbind n. The voice stays where it is in the
          queue; it becomes eligible for step 2 on the next note_on.

  queue before (pool of 3, all playing):   [A:60] [B:64] [C:67]
  note_on(72), nobody free, steal front:   [B:64] [C:67] [A:72]
  note 60 is no longer bound; note_off(60) is now a no-op.

Allocation never blocks and never fails. The cost of saturation is that the
oldest sound gets cut off.

Rendering sums every voice in the pool every block, playing or not, so
released voices keep their natural decay tails. `Voice::is_done` is not used
to skip voices.

Threading
---------
note_on/note_off take &mut self, so a single writer is enforced. When note
events come from another thread, attach an rtrb consumer with
`with_receiver`: messages are drained at the start of each render, on the
render thread, and the control thread never touches the synth. Do not wrap a
playing synth in `Shared` to call note_on from the control thread; that lock
is taken by the audio thread too.

Sample rate
-----------
Each render hands `ctx.sample_rate` to the voices when it differs from the
last rate seen, before queued messages are applied. Notes triggered directly,
before the first render, use whatever rate the voices were built with or were
given through `set_sample_rate`.
*/

new_key_type! {
    /// Stable handle to a voice in a [`PolySynth`] pool.
    pub struct VoiceId;
}

/// MIDI notes are not validated, so the table covers every `u8`.
const NOTE_SLOTS: usize = 256;

struct Slot<V> {
    voice: Cached<V>,
    note: Option<u8>,
}

pub struct PolySynth<V> {
    voices: SlotMap<VoiceId, Slot<V>>,
    queue: VecDeque<VoiceId>,
    notes: [Option<VoiceId>; NOTE_SLOTS],
    rx: Option<Box<dyn MessageReceiver>>,
    sample_rate: Option<f32>,
    temp_buffer: Vec<f32>,
}

impl<V: Voice> Default for PolySynth<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Voice> PolySynth<V> {
    /// Empty pool. Add voices with [`add_voice`](Self::add_voice) during setup.
    pub fn new() -> Self {
        Self {
            voices: SlotMap::with_key(),
            queue: VecDeque::new(),
            notes: [None; NOTE_SLOTS],
            rx: None,
            sample_rate: None,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn with_voices(voices: impl IntoIterator<Item = V>) -> Self {
        let mut synth = Self::new();
        for voice in voices {
            synth.add_voice(voice);
        }
        synth
    }

    pub fn with_factory<F>(count: usize, factory: F) -> Self
    where
        F: VoiceFactory<Voice = V>,
    {
        Self::with_voices((0..count).map(|index| factory.create_voice(index)))
    }

    /// Drain note events from `rx` at the start of every render.
    pub fn with_receiver(mut self, rx: impl MessageReceiver + 'static) -> Self {
        self.rx = Some(Box::new(rx));
        self
    }

    /// Take ownership of a voice and append it to the back of the pool.
    pub fn add_voice(&mut self, mut voice: V) -> VoiceId {
        if let Some(sample_rate) = self.sample_rate {
            voice.set_sample_rate(sample_rate);
        }
        let id = self.voices.insert(Slot {
            voice: Cached::new(voice),
            note: None,
        });
        self.queue.push_back(id);
        id
    }

    /// Remove a voice from the pool, unbinding its note if it has one.
    pub fn remove_voice(&mut self, id: VoiceId) -> Option<V> {
        let slot = self.voices.remove(id)?;
        self.queue.retain(|&queued| queued != id);
        if let Some(note) = slot.note {
            self.notes[note as usize] = None;
        }
        Some(slot.voice.into_inner())
    }

    /// Hand `sample_rate` to every voice. Rendering does this automatically
    /// whenever the context's rate differs from the last one seen.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = Some(sample_rate);
        for slot in self.voices.values_mut() {
            slot.voice.get_mut().set_sample_rate(sample_rate);
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) {
        if let Some(id) = self.notes[note as usize] {
            if let Some(slot) = self.voices.get_mut(id) {
                slot.voice.get_mut().note_on(note, velocity);
                return;
            }
        }

        let Some(id) = self.take_voice() else {
            return;
        };
        let Some(slot) = self.voices.get_mut(id) else {
            return;
        };

        if let Some(previous) = slot.note.replace(note) {
            self.notes[previous as usize] = None;
        }
        self.notes[note as usize] = Some(id);
        slot.voice.get_mut().note_on(note, velocity);

        self.queue.push_back(id);
    }

    pub fn note_off(&mut self, note: u8) {
        let Some(id) = self.notes[note as usize].take() else {
            return;
        };
        if let Some(slot) = self.voices.get_mut(id) {
            slot.note = None;
            slot.voice.get_mut().note_off();
        }
    }

    pub fn all_notes_off(&mut self) {
        for note in 0..NOTE_SLOTS {
            if self.notes[note].is_some() {
                self.note_off(note as u8);
            }
        }
    }

    pub fn handle(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff { note } => self.note_off(note),
            SynthMessage::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Voice currently bound to `note`.
    pub fn voice_for(&self, note: u8) -> Option<VoiceId> {
        self.notes[note as usize]
    }

    /// Notes that currently have a voice, in ascending order.
    pub fn active_notes(&self) -> impl Iterator<Item = u8> + '_ {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, id)| id.is_some())
            .map(|(note, _)| note as u8)
    }

    pub fn voice(&self, id: VoiceId) -> Option<&V> {
        self.voices.get(id).map(|slot| slot.voice.get())
    }

    pub fn voice_mut(&mut self, id: VoiceId) -> Option<&mut V> {
        self.voices.get_mut(id).map(|slot| slot.voice.get_mut())
    }

    /// Pool in priority order, oldest assignment first.
    pub fn pool_order(&self) -> impl Iterator<Item = VoiceId> + '_ {
        self.queue.iter().copied()
    }

    pub fn playing_count(&self) -> usize {
        self.voices
            .values()
            .filter(|slot| slot.voice.get().is_playing())
            .count()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Pull the next voice out of the queue: first free one, else the oldest.
    fn take_voice(&mut self) -> Option<VoiceId> {
        let free = self.queue.iter().position(|&id| {
            self.voices
                .get(id)
                .is_some_and(|slot| !slot.voice.get().is_playing())
        });

        match free {
            Some(index) => self.queue.remove(index),
            None => {
                let stolen = self.queue.pop_front()?;
                if let Some(note) = self.voices.get(stolen).and_then(|slot| slot.note) {
                    debug!(note, "voice stolen");
                }
                Some(stolen)
            }
        }
    }

    fn drain_messages(&mut self) {
        if let Some(mut rx) = self.rx.take() {
            while let Some(msg) = rx.pop() {
                self.handle(msg);
            }
            self.rx = Some(rx);
        }
    }
}

impl<V: Voice> RenderUnit for PolySynth<V> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // before draining, so queued notes are pitched at the server's rate
        if self.sample_rate != Some(ctx.sample_rate) {
            self.set_sample_rate(ctx.sample_rate);
        }
        self.drain_messages();

        out.fill(0.0);
        if self.temp_buffer.len() < out.len() {
            self.temp_buffer.resize(out.len(), 0.0);
        }
        let frames = &mut self.temp_buffer[..out.len()];

        for id in &self.queue {
            if let Some(slot) = self.voices.get_mut(*id) {
                slot.voice.process(frames, ctx);
                for (o, v) in out.iter_mut().zip(frames.iter()) {
                    *o += v;
                }
            }
        }
    }
}

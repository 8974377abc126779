#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

/// Note events for a [`PolySynth`](crate::synth::poly::PolySynth).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
}

/// Non-blocking source of queued messages, drained on the render thread.
pub trait MessageReceiver: Send {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Lock-free single-producer queue from a control thread to a synth.
///
/// Keep the producer on the control thread and hand the consumer to
/// [`PolySynth::with_receiver`](crate::synth::poly::PolySynth::with_receiver).
#[cfg(feature = "rtrb")]
pub fn note_queue(capacity: usize) -> (Producer<SynthMessage>, Consumer<SynthMessage>) {
    RingBuffer::new(capacity)
}

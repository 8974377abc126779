use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Translate a MIDI event on `channel_filter` into a synth message.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { channel, key, .. } if channel == channel_filter => {
            Some(SynthMessage::NoteOff { note: key })
        }
        _ => None,
    }
}

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

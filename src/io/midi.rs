const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

impl MidiEvent {
    /// Parse a raw channel-voice message.
    ///
    /// Only note-on and note-off are recognised; anything else (controllers,
    /// running status, sysex, short messages) yields `None`. A note-on with
    /// velocity 0 is reported as a note-off.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let [status, key, velocity] = *bytes else {
            return None;
        };
        let channel = status & 0x0F;
        let (key, velocity) = (key & 0x7F, velocity & 0x7F);

        match status & 0xF0 {
            NOTE_ON if velocity > 0 => Some(Self::NoteOn {
                channel,
                key,
                velocity,
            }),
            NOTE_ON | NOTE_OFF => Some(Self::NoteOff {
                channel,
                key,
                velocity,
            }),
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            Self::NoteOn { channel, .. } | Self::NoteOff { channel, .. } => channel,
        }
    }
}

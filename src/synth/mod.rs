// Purpose: Voice management, polyphony, note events
// This layer sits above render units and manages a pool of voices

pub mod factory;
pub mod message;
pub mod poly;
pub mod voice;

pub use poly::{PolySynth, VoiceId};
pub use voice::{Voice, VoiceState};

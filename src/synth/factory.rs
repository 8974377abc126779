use crate::synth::voice::Voice;

/// Factory for creating voices with a specific sound design
///
/// Configure the instrument once, then `PolySynth::with_factory` uses the
/// factory to fill its pool. The index lets each voice differ (e.g. noise
/// seeds) while sharing a patch.
pub trait VoiceFactory {
    type Voice: Voice;

    fn create_voice(&self, index: usize) -> Self::Voice;
}

impl<F, V> VoiceFactory for F
where
    F: Fn(usize) -> V,
    V: Voice,
{
    type Voice = V;

    fn create_voice(&self, index: usize) -> Self::Voice {
        self(index)
    }
}

//! Default-device output through cpal.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use crate::{
    engine::server::MixServer,
    error::{EngineError, Result},
};

/// A running output stream pulling blocks from a [`MixServer`].
///
/// The server's sample rate and output channel count are overwritten with
/// the device's defaults before the stream starts. Audio stops when this
/// value is dropped.
pub struct CpalOutput {
    stream: cpal::Stream,
    sample_rate: f32,
    channels: usize,
}

impl CpalOutput {
    pub fn start(server: Arc<MixServer>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        server.set_sample_rate(sample_rate)?;
        server.set_output_channels(channels);

        let stream = device.build_output_stream(
            &config.config(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                // no capture stream; units see silence on every input channel
                server.callback_interleaved(&[], data);
            },
            |err| error!(%err, "output stream error"),
            None,
        )?;
        stream.play()?;

        info!(sample_rate, channels, "audio output started");
        Ok(Self {
            stream,
            sample_rate,
            channels,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pause(&self) -> Result<()> {
        self.stream.pause().map_err(EngineError::PauseStream)
    }
}

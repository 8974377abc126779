//! Engine configuration, fixed at startup.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    MAX_BLOCK_SIZE,
};

/// Startup parameters for a [`MixServer`](crate::MixServer).
///
/// `max_block_size` bounds the frame count of a single callback; every
/// scratch buffer on the render path is sized from it up front.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    pub input_channels: usize,
    pub output_channels: usize,
    pub max_block_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            input_channels: 1,
            output_channels: 1,
            max_block_size: MAX_BLOCK_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_input_channels(mut self, channels: usize) -> Self {
        self.input_channels = channels;
        self
    }

    pub fn with_output_channels(mut self, channels: usize) -> Self {
        self.output_channels = channels;
        self
    }

    pub fn with_max_block_size(mut self, frames: usize) -> Self {
        self.max_block_size = frames;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_sample_rate(self.sample_rate)?;
        if self.max_block_size == 0 {
            return Err(EngineError::InvalidBlockSize);
        }
        Ok(())
    }
}

pub(crate) fn validate_sample_rate(sample_rate: f32) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidSampleRate(sample_rate))
    }
}

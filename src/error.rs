use thiserror::Error;

/// Recoverable failures. Broken preconditions on the render path are
/// assertions, not variants of this type.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    #[error("maximum block size must be at least one frame")]
    InvalidBlockSize,

    #[cfg(feature = "cpal")]
    #[error("no default output device available")]
    NoOutputDevice,

    #[cfg(feature = "cpal")]
    #[error("failed to fetch default output config")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "cpal")]
    #[error("failed to build output stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "cpal")]
    #[error("failed to start output stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "cpal")]
    #[error("failed to pause output stream")]
    PauseStream(#[source] cpal::PauseStreamError),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

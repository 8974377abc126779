pub mod config;
pub mod dsp;
pub mod engine; // Mix server and output drivers
pub mod error;
pub mod graph; // Render units and the cache contract
pub mod io;
pub mod synth; // Voice management and polyphony
pub mod voices;

pub use config::EngineConfig;
pub use engine::server::{MixServer, UnitId};
pub use error::{EngineError, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;

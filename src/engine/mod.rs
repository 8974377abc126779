//! Mixing server and audio driver glue.

#[cfg(feature = "cpal")]
pub mod device;
pub mod server;

#[cfg(feature = "cpal")]
pub use device::CpalOutput;
pub use server::{MixServer, UnitId};

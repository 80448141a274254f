//! Stellar observation simulation for a UV imaging telescope
//!
//! This crate synthesizes mock single-star detector frames from a measured
//! point-spread function: the PSF is scaled to a per-filter photo-electron
//! budget, placed on a blank canvas at a (possibly fractional) pixel offset,
//! and degraded with photon shot noise and detector read noise. A driver
//! layer replays spacecraft sun-center telemetry as a time-varying pointing
//! jitter and renders one frame per cadence step.

pub mod io;
pub mod jitter;
pub mod photometry;
pub mod psf;
pub mod synth;

// Re-exports for easier access
pub use jitter::driver::{JitterSim, JitterSimConfig, RunSummary};
pub use jitter::telemetry::SunCenterSeries;
pub use photometry::filters::{Filter, UnknownFilterError};
pub use psf::PsfImage;
pub use synth::config::SynthesisConfig;
pub use synth::frame::{FrameSynthesizer, Offset, SynthesizedFrame};

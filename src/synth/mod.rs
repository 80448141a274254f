//! Synthetic frame generation: star placement and detector noise

pub mod config;
pub mod frame;
pub mod noise;

pub use config::SynthesisConfig;
pub use frame::{FrameSynthesizer, Offset, SynthesizedFrame};

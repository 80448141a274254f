//! File I/O for simulated frames and supporting data

pub mod dither_log;
pub mod fits;
pub mod preview;

pub use fits::{read_image, write_image, FitsError};

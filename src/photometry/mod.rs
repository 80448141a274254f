//! Photometric bookkeeping for the simulated instrument

pub mod filters;

pub use filters::{Filter, UnknownFilterError};

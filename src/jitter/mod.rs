//! Pointing-jitter replay from sun-center telemetry

pub mod driver;
pub mod interp;
pub mod telemetry;

pub use driver::{JitterSim, JitterSimConfig, RunSummary};
pub use interp::{InterpolationError, LinearSeries};
pub use telemetry::{find_telemetry_file, SunCenterSeries, TelemetryError};

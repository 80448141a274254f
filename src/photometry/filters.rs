//! Science filter set and per-filter photo-electron budgets.
//!
//! Each filter carries a calibrated photo-electron rate for an on-axis
//! stellar point source, together with a throughput degradation factor
//! measured after commissioning. The product of the two is the rate the
//! frame synthesizer injects.

use std::fmt;
use std::str::FromStr;

/// Requested filter code is not part of the instrument's filter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilterError(pub String);

impl fmt::Display for UnknownFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown filter '{}', expected one of: {}",
            self.0,
            Filter::ALL
                .iter()
                .map(|flt| flt.name())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for UnknownFilterError {}

/// Science filters of the instrument's filter wheels.
///
/// NB filters are narrow-band, BB filters broad-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Nb01,
    Nb02,
    Nb03,
    Nb04,
    Nb05,
    Nb06,
    Nb07,
    Nb08,
    Bb01,
    Bb02,
    Bb03,
}

impl Filter {
    /// Every filter in wheel order.
    pub const ALL: [Filter; 11] = [
        Filter::Nb01,
        Filter::Nb02,
        Filter::Nb03,
        Filter::Nb04,
        Filter::Nb05,
        Filter::Nb06,
        Filter::Nb07,
        Filter::Nb08,
        Filter::Bb01,
        Filter::Bb02,
        Filter::Bb03,
    ];

    /// Calibrated photo-electron rate for an on-axis point source, in
    /// e⁻/s, before throughput degradation.
    pub fn base_rate_e_per_s(&self) -> f64 {
        match self {
            Filter::Nb01 => 2083.0,
            Filter::Nb02 => 694.0,
            Filter::Nb03 => 694.0,
            Filter::Nb04 => 833.0,
            Filter::Nb05 => 1042.0,
            Filter::Nb06 => 1190.0,
            Filter::Nb07 => 1389.0,
            Filter::Nb08 => 46.0,
            Filter::Bb01 => 8333.0,
            Filter::Bb02 => 833.0,
            Filter::Bb03 => 1389.0,
        }
    }

    /// Measured post-commissioning throughput degradation factor.
    pub fn degradation_factor(&self) -> f64 {
        match self {
            Filter::Nb01 => 0.30,
            Filter::Nb02 => 0.68,
            Filter::Nb03 => 0.72,
            Filter::Nb04 => 0.68,
            Filter::Nb05 => 0.78,
            Filter::Nb06 => 0.80,
            Filter::Nb07 => 0.93,
            Filter::Nb08 => 0.90,
            Filter::Bb01 => 0.30,
            Filter::Bb02 => 0.72,
            Filter::Bb03 => 0.88,
        }
    }

    /// Degradation-adjusted photo-electron rate in e⁻/s.
    pub fn photon_rate_e_per_s(&self) -> f64 {
        self.base_rate_e_per_s() * self.degradation_factor()
    }

    /// Canonical filter code as it appears in file names and telemetry.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Nb01 => "NB01",
            Filter::Nb02 => "NB02",
            Filter::Nb03 => "NB03",
            Filter::Nb04 => "NB04",
            Filter::Nb05 => "NB05",
            Filter::Nb06 => "NB06",
            Filter::Nb07 => "NB07",
            Filter::Nb08 => "NB08",
            Filter::Bb01 => "BB01",
            Filter::Bb02 => "BB02",
            Filter::Bb03 => "BB03",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = UnknownFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::ALL
            .iter()
            .copied()
            .find(|flt| flt.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFilterError(s.to_string()))
    }
}

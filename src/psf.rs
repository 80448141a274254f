//! Reference point-spread-function image.
//!
//! The PSF is a small cutout of a single stellar image from a calibration
//! frame, background subtracted and peak normalized. It is loaded once and
//! treated as immutable; the synthesizer rescales it per frame.

use crate::io::fits::{self, FitsError};
use ndarray::Array2;
use std::fmt;
use std::path::Path;

/// Error types for PSF validation and loading
#[derive(Debug)]
pub enum PsfError {
    /// PSF grid contains a NaN, infinite, or negative cell
    InvalidCell { row: usize, col: usize, value: f64 },
    /// PSF sums to zero, so it cannot be normalized
    ZeroSum,
    /// Underlying FITS read failed
    Io(FitsError),
}

impl fmt::Display for PsfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsfError::InvalidCell { row, col, value } => {
                write!(f, "PSF cell ({row}, {col}) has invalid value {value}")
            }
            PsfError::ZeroSum => write!(f, "PSF sums to zero and cannot be normalized"),
            PsfError::Io(err) => write!(f, "PSF load failed: {err}"),
        }
    }
}

impl std::error::Error for PsfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PsfError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FitsError> for PsfError {
    fn from(err: FitsError) -> Self {
        PsfError::Io(err)
    }
}

/// Validated reference PSF with cached totals.
#[derive(Debug, Clone)]
pub struct PsfImage {
    data: Array2<f64>,
    total: f64,
    peak: f64,
}

impl PsfImage {
    /// Wrap a PSF grid, checking that every cell is finite and
    /// non-negative and that the grid sums to a positive value.
    pub fn new(data: Array2<f64>) -> Result<Self, PsfError> {
        for ((row, col), &value) in data.indexed_iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(PsfError::InvalidCell { row, col, value });
            }
        }
        let total = data.sum();
        if total <= 0.0 {
            return Err(PsfError::ZeroSum);
        }
        let peak = data.iter().copied().fold(0.0_f64, f64::max);
        Ok(Self { data, total, peak })
    }

    /// Load the PSF from the primary HDU of a FITS file.
    pub fn from_fits<P: AsRef<Path>>(path: P) -> Result<Self, PsfError> {
        Self::new(fits::read_image(path)?)
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// (height, width) of the PSF grid
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Sum over all cells, guaranteed positive.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Maximum cell value.
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// PSF scaled so the sum of all cells equals `total_e` photo-electrons.
    pub fn scaled_to_total(&self, total_e: f64) -> Array2<f64> {
        &self.data * (total_e / self.total)
    }

    /// PSF scaled so the brightest cell equals `peak_e` photo-electrons.
    pub fn scaled_to_peak(&self, peak_e: f64) -> Array2<f64> {
        &self.data * (peak_e / self.peak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Symmetric 5x5 pyramid PSF with peak 1.0 at the center.
    pub(crate) fn pyramid_psf() -> PsfImage {
        let data = Array2::from_shape_fn((5, 5), |(r, c)| {
            let dr = (r as isize - 2).unsigned_abs();
            let dc = (c as isize - 2).unsigned_abs();
            1.0 / (1 + dr + dc) as f64
        });
        PsfImage::new(data).unwrap()
    }

    #[test]
    fn test_valid_psf_accepted() {
        let psf = pyramid_psf();
        assert_eq!(psf.dim(), (5, 5));
        assert_relative_eq!(psf.peak(), 1.0);
        assert!(psf.total() > 0.0);
    }

    #[test]
    fn test_negative_cell_rejected() {
        let mut data = Array2::from_elem((3, 3), 0.5);
        data[[1, 2]] = -0.1;
        assert!(matches!(
            PsfImage::new(data),
            Err(PsfError::InvalidCell { row: 1, col: 2, .. })
        ));
    }

    #[test]
    fn test_nan_cell_rejected() {
        let mut data = Array2::from_elem((3, 3), 0.5);
        data[[0, 0]] = f64::NAN;
        assert!(matches!(
            PsfImage::new(data),
            Err(PsfError::InvalidCell { row: 0, col: 0, .. })
        ));
    }

    #[test]
    fn test_zero_sum_rejected() {
        let data = Array2::zeros((4, 4));
        assert!(matches!(PsfImage::new(data), Err(PsfError::ZeroSum)));
    }

    #[test]
    fn test_scaled_to_total() {
        let psf = pyramid_psf();
        let star = psf.scaled_to_total(1291.77);
        assert_relative_eq!(star.sum(), 1291.77, epsilon = 1e-9);
    }

    #[test]
    fn test_scaled_to_peak() {
        let psf = pyramid_psf();
        let star = psf.scaled_to_peak(66.0);
        let peak = star.iter().copied().fold(0.0_f64, f64::max);
        assert_relative_eq!(peak, 66.0, epsilon = 1e-9);
    }
}

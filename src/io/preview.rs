//! Grayscale PNG previews of simulated frames.
//!
//! Frames sit on a ~1500 e⁻ bias with a faint star on top, so a straight
//! min/max mapping would bury the star; a percentile stretch keeps it
//! visible regardless of the noise tails.

use image::{GrayImage, Luma};
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("preview encode failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("cannot preview an empty image")]
    EmptyImage,
}

/// Map a frame to u8 with a percentile stretch and save it as a PNG.
///
/// Values at or below the `lower_percentile` map to 0, values at or above
/// the `upper_percentile` map to 255.
pub fn save_preview<P: AsRef<Path>>(
    path: P,
    image: &Array2<f64>,
    lower_percentile: f64,
    upper_percentile: f64,
) -> Result<(), PreviewError> {
    assert!(
        (0.0..=100.0).contains(&lower_percentile)
            && (0.0..=100.0).contains(&upper_percentile)
            && lower_percentile < upper_percentile,
        "Percentiles must satisfy 0 <= lower < upper <= 100"
    );
    if image.is_empty() {
        return Err(PreviewError::EmptyImage);
    }

    let mut sorted: Vec<f64> = image.iter().copied().collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let pick = |pct: f64| {
        let idx = ((pct / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx]
    };
    let low = pick(lower_percentile);
    let high = pick(upper_percentile);
    let range = (high - low).max(f64::EPSILON);

    let stretched = image.mapv(|v| (((v - low) / range).clamp(0.0, 1.0) * 255.0).round() as u8);

    // Map array[y, x] to image pixel (x, y)
    let (height, width) = stretched.dim();
    let mut png = GrayImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            png.put_pixel(x as u32, y as u32, Luma([stretched[[y, x]]]));
        }
    }
    png.save(path)?;
    Ok(())
}

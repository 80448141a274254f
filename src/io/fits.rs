//! FITS image I/O for PSF references and simulated frames.
//!
//! Frames and PSFs are single-extension f64 images. FITS stores rows
//! bottom-up, ndarray top-down, so both directions flip vertically.

use fitsio::hdu::HduInfo;
use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during FITS file operations
#[derive(Error, Debug)]
pub enum FitsError {
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::errors::Error),
    #[error("primary HDU is not a 2-D image (shape {0:?})")]
    NotTwoDimensional(Vec<usize>),
    #[error("image data does not match declared shape {0}x{1}")]
    ShapeMismatch(usize, usize),
    #[error("failed to remove stale output file: {0}")]
    Clobber(#[from] std::io::Error),
}

/// Read the primary HDU of a FITS file as a 2-D f64 array.
///
/// Integer and f32 images are widened to f64 by cfitsio on read.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, FitsError> {
    let mut fptr = FitsFile::open(&path)?;
    let hdu = fptr.primary_hdu()?;

    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape.clone(),
        _ => return Err(FitsError::NotTwoDimensional(vec![])),
    };
    if shape.len() != 2 {
        return Err(FitsError::NotTwoDimensional(shape));
    }
    let (height, width) = (shape[0], shape[1]);

    let data: Vec<f64> = hdu.read_image(&mut fptr)?;
    let raster = Array2::from_shape_vec((height, width), data)
        .map_err(|_| FitsError::ShapeMismatch(height, width))?;

    // Flip vertically to match ndarray convention (FITS origin is bottom-left)
    let flipped = raster.slice(ndarray::s![..;-1, ..]).to_owned();
    Ok(flipped)
}

/// Write a 2-D f64 array as the primary HDU of a new FITS file.
///
/// An existing file at `path` is replaced.
pub fn write_image<P: AsRef<Path>>(path: P, image: &Array2<f64>) -> Result<(), FitsError> {
    let path = path.as_ref();
    if path.exists() {
        std::fs::remove_file(path)?;
    }

    let (height, width) = image.dim();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[height, width],
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&description)
        .open()?;
    let hdu = fptr.primary_hdu()?;

    let flipped = image.slice(ndarray::s![..;-1, ..]);
    let flat: Vec<f64> = flipped.iter().copied().collect();
    hdu.write_image(&mut fptr, &flat)?;
    Ok(())
}

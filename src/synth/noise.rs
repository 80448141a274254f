//! Detector noise sampling.
//!
//! Shot noise follows the Poisson statistics of photon arrival and applies
//! to the star signal only; read noise is an additive Gaussian field from
//! the readout electronics, independent of signal level.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal, Poisson};

/// Above this mean the Poisson draw is replaced by its Gaussian
/// approximation, which is faster and numerically stable.
const POISSON_GAUSSIAN_CROSSOVER: f64 = 20.0;

/// Apply Poisson arrival statistics to a mean electron image.
///
/// Each pixel value is treated as the mean of a Poisson distribution and
/// replaced with one sample from it. Zero-mean pixels stay zero.
///
/// # Arguments
/// * `mean_electron_image` - 2D array of mean electron counts per pixel
/// * `rng_seed` - Optional seed for reproducible output
pub fn apply_shot_noise(
    mean_electron_image: &Array2<f64>,
    rng_seed: Option<u64>,
) -> Array2<f64> {
    let seed = rng_seed.unwrap_or(thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);

    mean_electron_image.mapv(|mean_electrons| {
        if mean_electrons <= 0.0 {
            return 0.0;
        }
        if mean_electrons < POISSON_GAUSSIAN_CROSSOVER {
            let poisson = Poisson::new(mean_electrons)
                .expect("Poisson parameter must be valid (mean_electrons > 0)");
            poisson.sample(&mut rng)
        } else {
            let normal = Normal::new(mean_electrons, mean_electrons.sqrt())
                .expect("Normal parameters must be valid (mean_electrons > 0)");
            normal.sample(&mut rng).max(0.0)
        }
    })
}

/// Generate an additive read-noise field.
///
/// Every cell is an independent draw from Normal(`mean_e`, `rms_e`); the
/// mean carries the detector bias so the output frame stays non-negative.
pub fn read_noise_field(
    size: (usize, usize),
    mean_e: f64,
    rms_e: f64,
    rng_seed: Option<u64>,
) -> Array2<f64> {
    let seed = rng_seed.unwrap_or(thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean_e, rms_e)
        .expect("Normal distribution parameters must be valid (rms_e > 0)");
    Array2::from_shape_fn(size, |_| normal.sample(&mut rng))
}

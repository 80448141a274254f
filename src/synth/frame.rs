//! Single-frame synthesis.
//!
//! A frame is built in three steps: scale the reference PSF to the
//! photo-electron budget of the requested filter, overwrite a window of a
//! blank canvas with the scaled star at the requested pixel offset, then
//! degrade with shot noise followed by additive read noise. Placement
//! truncates the fractional offset to whole pixels; the PSF itself is
//! never resampled.

use ndarray::{s, Array2};

use crate::photometry::filters::{Filter, UnknownFilterError};
use crate::psf::PsfImage;
use crate::synth::config::SynthesisConfig;
use crate::synth::noise::{apply_shot_noise, read_noise_field};

/// Pixel-space displacement of the star center from the frame center.
///
/// `del_c` moves the star along columns (x), `del_r` along rows (y). Both
/// may be fractional; placement truncates toward zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub del_c: f64,
    pub del_r: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset {
        del_c: 0.0,
        del_r: 0.0,
    };

    pub fn new(del_c: f64, del_r: f64) -> Self {
        Self { del_c, del_r }
    }
}

/// One synthesized frame, with the pre-noise star component kept
/// separately for diagnostics and tests.
#[derive(Debug, Clone)]
pub struct SynthesizedFrame {
    /// Star contribution before any noise, in photo-electrons
    pub star_image: Array2<f64>,
    /// Final frame: shot-noised star plus read-noise field
    pub image: Array2<f64>,
}

/// Renders simulated single-star frames from a fixed PSF and configuration.
#[derive(Debug, Clone)]
pub struct FrameSynthesizer {
    psf: PsfImage,
    config: SynthesisConfig,
}

impl FrameSynthesizer {
    pub fn new(psf: PsfImage, config: SynthesisConfig) -> Self {
        Self { psf, config }
    }

    pub fn psf(&self) -> &PsfImage {
        &self.psf
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize one frame for a filter, injecting
    /// `photon_rate × exposure` photo-electrons of total star flux.
    pub fn synthesize(
        &self,
        offset: Offset,
        filter: Filter,
        rng_seed: Option<u64>,
    ) -> SynthesizedFrame {
        let flux_e = filter.photon_rate_e_per_s() * self.config.exposure.as_secs_f64();
        self.render(self.psf.scaled_to_total(flux_e), offset, rng_seed)
    }

    /// As [`synthesize`](Self::synthesize), but resolving the filter from
    /// its string code first. Nothing is allocated for an unknown code.
    pub fn synthesize_named(
        &self,
        offset: Offset,
        filter_name: &str,
        rng_seed: Option<u64>,
    ) -> Result<SynthesizedFrame, UnknownFilterError> {
        let filter: Filter = filter_name.parse()?;
        Ok(self.synthesize(offset, filter, rng_seed))
    }

    /// Synthesize one frame with the PSF scaled so its brightest pixel
    /// carries `peak_e` photo-electrons, independent of any filter.
    pub fn synthesize_peak(
        &self,
        offset: Offset,
        peak_e: f64,
        rng_seed: Option<u64>,
    ) -> SynthesizedFrame {
        self.render(self.psf.scaled_to_peak(peak_e), offset, rng_seed)
    }

    fn render(&self, star: Array2<f64>, offset: Offset, rng_seed: Option<u64>) -> SynthesizedFrame {
        let mut canvas = Array2::zeros((self.config.height, self.config.width));
        place_star(&mut canvas, &star, offset);

        // Shot noise belongs to the starlight only; the bias and read
        // noise are added afterwards. A supplied seed is split so the two
        // fields stay independent.
        let shot = apply_shot_noise(&canvas, rng_seed);
        let read = read_noise_field(
            canvas.dim(),
            self.config.read_noise_mean_e(),
            self.config.read_noise_rms_e,
            rng_seed.map(|seed| seed.wrapping_add(1)),
        );

        SynthesizedFrame {
            star_image: canvas,
            image: shot + read,
        }
    }
}

/// Overwrite a window of `canvas` with `star`, centered at the canvas
/// center plus `offset`, truncated to whole pixels.
///
/// Bounds policy: the window is clipped to the canvas and only the
/// overlapping sub-region is copied. A star that falls entirely outside
/// leaves the canvas untouched. Pixels outside the window are never
/// written.
fn place_star(canvas: &mut Array2<f64>, star: &Array2<f64>, offset: Offset) {
    let (height, width) = canvas.dim();
    let (star_h, star_w) = star.dim();
    let (star_row_c, star_col_c) = (star_h / 2, star_w / 2);

    let row0 = (height as f64 / 2.0 - star_row_c as f64 + offset.del_r).trunc() as isize;
    let col0 = (width as f64 / 2.0 - star_col_c as f64 + offset.del_c).trunc() as isize;

    let r_start = row0.max(0);
    let r_end = (row0 + star_h as isize).min(height as isize);
    let c_start = col0.max(0);
    let c_end = (col0 + star_w as isize).min(width as isize);
    if r_start >= r_end || c_start >= c_end {
        return;
    }

    let sr = (r_start - row0) as usize;
    let sc = (c_start - col0) as usize;
    let (rows, cols) = ((r_end - r_start) as usize, (c_end - c_start) as usize);

    canvas
        .slice_mut(s![
            r_start as usize..r_start as usize + rows,
            c_start as usize..c_start as usize + cols
        ])
        .assign(&star.slice(s![sr..sr + rows, sc..sc + cols]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    /// Symmetric 5x5 pyramid PSF, peak 1.0 at the center cell.
    fn pyramid_psf() -> PsfImage {
        let data = Array2::from_shape_fn((5, 5), |(r, c)| {
            let dr = (r as isize - 2).unsigned_abs();
            let dc = (c as isize - 2).unsigned_abs();
            1.0 / (1 + dr + dc) as f64
        });
        PsfImage::new(data).unwrap()
    }

    fn small_synthesizer() -> FrameSynthesizer {
        FrameSynthesizer::new(
            pyramid_psf(),
            SynthesisConfig {
                height: 64,
                width: 64,
                ..SynthesisConfig::default()
            },
        )
    }

    #[test]
    fn test_centered_star_is_bilaterally_symmetric() {
        let frame = small_synthesizer().synthesize(Offset::ZERO, Filter::Nb07, Some(3));
        let star = &frame.star_image;
        let (hc, wc) = (32, 32);

        for d in 1..=2 {
            assert_relative_eq!(star[[hc + d, wc]], star[[hc - d, wc]]);
            assert_relative_eq!(star[[hc, wc + d]], star[[hc, wc - d]]);
            assert_relative_eq!(star[[hc + d, wc + d]], star[[hc - d, wc - d]]);
        }
    }

    #[test]
    fn test_total_injected_flux_equals_rate_times_exposure() {
        let synth = small_synthesizer();
        let frame = synth.synthesize(Offset::ZERO, Filter::Nb07, Some(5));
        let expected = Filter::Nb07.photon_rate_e_per_s();
        assert_relative_eq!(frame.star_image.sum(), expected, epsilon = 1e-9);

        let synth = FrameSynthesizer::new(
            pyramid_psf(),
            SynthesisConfig {
                height: 64,
                width: 64,
                exposure: Duration::from_secs_f64(2.5),
                ..SynthesisConfig::default()
            },
        );
        let frame = synth.synthesize(Offset::ZERO, Filter::Bb03, Some(5));
        assert_relative_eq!(
            frame.star_image.sum(),
            Filter::Bb03.photon_rate_e_per_s() * 2.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_peak_mode_sets_peak_intensity() {
        let frame = small_synthesizer().synthesize_peak(Offset::ZERO, 66.0, Some(5));
        let peak = frame.star_image.iter().copied().fold(0.0_f64, f64::max);
        assert_relative_eq!(peak, 66.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_canvas_shape_and_peak_position() {
        let synth = FrameSynthesizer::new(pyramid_psf(), SynthesisConfig::default());
        let frame = synth.synthesize(Offset::ZERO, Filter::Nb07, Some(17));

        assert_eq!(frame.image.dim(), (320, 320));
        assert_eq!(frame.star_image.dim(), (320, 320));

        let (peak_pos, _) = frame
            .star_image
            .indexed_iter()
            .fold(((0, 0), f64::MIN), |acc, (pos, &v)| {
                if v > acc.1 {
                    (pos, v)
                } else {
                    acc
                }
            });
        assert_eq!(peak_pos, (160, 160));
    }

    #[test]
    fn test_fractional_offset_truncates_to_pixels() {
        let synth = small_synthesizer();
        let exact = synth.synthesize(Offset::new(3.0, 2.0), Filter::Nb05, Some(1));
        let fractional = synth.synthesize(Offset::new(3.9, 2.9), Filter::Nb05, Some(1));
        assert_eq!(exact.star_image, fractional.star_image);
    }

    #[test]
    fn test_offset_moves_peak() {
        let frame = small_synthesizer().synthesize(Offset::new(5.0, -7.0), Filter::Nb07, Some(2));
        let (peak_pos, _) = frame
            .star_image
            .indexed_iter()
            .fold(((0, 0), f64::MIN), |acc, (pos, &v)| {
                if v > acc.1 {
                    (pos, v)
                } else {
                    acc
                }
            });
        assert_eq!(peak_pos, (32 - 7, 32 + 5));
    }

    #[test]
    fn test_partially_outside_offset_clips() {
        let synth = small_synthesizer();
        let inside = synth.synthesize(Offset::ZERO, Filter::Nb07, Some(4));
        // Shift so the star straddles the right edge: center at col 63,
        // two of the five PSF columns fall off canvas.
        let clipped = synth.synthesize(Offset::new(31.0, 0.0), Filter::Nb07, Some(4));

        let full_flux = inside.star_image.sum();
        let clipped_flux = clipped.star_image.sum();
        assert!(clipped_flux > 0.0);
        assert!(clipped_flux < full_flux);

        // The surviving columns match the corresponding in-bounds columns
        // of the centered star
        for r in 0..5 {
            for c in 0..3 {
                assert_relative_eq!(
                    clipped.star_image[[30 + r, 61 + c]],
                    inside.star_image[[30 + r, 30 + c]]
                );
            }
        }
    }

    #[test]
    fn test_fully_outside_offset_leaves_canvas_blank() {
        let frame = small_synthesizer().synthesize(Offset::new(500.0, 0.0), Filter::Nb07, Some(4));
        assert_eq!(frame.star_image.sum(), 0.0);
    }

    #[test]
    fn test_unknown_filter_name_is_rejected() {
        let synth = small_synthesizer();
        let err = synth
            .synthesize_named(Offset::ZERO, "XX99", Some(1))
            .unwrap_err();
        assert_eq!(err, UnknownFilterError("XX99".to_string()));
    }

    #[test]
    fn test_known_filter_name_resolves() {
        let synth = small_synthesizer();
        let named = synth
            .synthesize_named(Offset::ZERO, "NB07", Some(8))
            .unwrap();
        let typed = synth.synthesize(Offset::ZERO, Filter::Nb07, Some(8));
        assert_eq!(named.image, typed.image);
    }

    #[test]
    fn test_repeated_synthesis_same_mean_different_samples() {
        let synth = small_synthesizer();
        let a = synth.synthesize(Offset::ZERO, Filter::Nb07, None);
        let b = synth.synthesize(Offset::ZERO, Filter::Nb07, None);

        assert_eq!(a.star_image, b.star_image);
        assert_ne!(a.image, b.image);
        // Frame means agree to within a few read-noise standard errors
        let sem = 10.0 / (64.0 * 64.0_f64).sqrt();
        assert_relative_eq!(
            a.image.mean().unwrap(),
            b.image.mean().unwrap(),
            epsilon = 6.0 * sem
        );
    }

    #[test]
    fn test_star_free_region_statistics() {
        // 320x320 canvas, 5x5 star: almost every pixel is read noise only
        let synth = FrameSynthesizer::new(pyramid_psf(), SynthesisConfig::default());
        let frame = synth.synthesize(Offset::ZERO, Filter::Nb07, Some(23));

        let background: Vec<f64> = frame
            .image
            .indexed_iter()
            .filter(|((r, c), _)| frame.star_image[[*r, *c]] == 0.0)
            .map(|(_, &v)| v)
            .collect();
        let n = background.len() as f64;
        let mean = background.iter().sum::<f64>() / n;
        let var = background.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        assert_relative_eq!(mean, 1505.0, epsilon = 0.5);
        assert_relative_eq!(var.sqrt(), 10.0, epsilon = 0.3);
    }
}

//! Telemetry-driven frame series.
//!
//! Replays a sun-center telemetry file as a pointing-jitter time series:
//! one frame per cadence step, offset by the interpolated sun-center
//! excursion. Setup failures (missing telemetry, bad data) abort the run;
//! a failure on an individual frame is logged and the loop moves on.

use log::{info, warn};
use std::path::PathBuf;
use thiserror::Error;

use crate::io::dither_log::write_dither_log;
use crate::io::fits;
use crate::io::preview::save_preview;
use crate::jitter::telemetry::{find_telemetry_file, SunCenterSeries, TelemetryError};
use crate::photometry::filters::Filter;
use crate::synth::frame::{FrameSynthesizer, Offset};

/// Sun-center telemetry units to detector pixels. Fixed by the optics and
/// detector geometry; documented constant, not derived.
pub const SUN_CENTER_TO_PIXEL: f64 = 2.0;

/// Percentile stretch used for frame previews.
const PREVIEW_PERCENTILES: (f64, f64) = (1.0, 99.5);

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("frame period must be positive")]
    ZeroFramePeriod,
    #[error("cannot create output directory {dir}: {source}")]
    OutputDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write dither log {path}: {source}")]
    DitherLog {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Run configuration for one telemetry replay.
#[derive(Debug, Clone)]
pub struct JitterSimConfig {
    /// Directory holding `.suncentre` telemetry files
    pub telemetry_dir: PathBuf,
    /// Observation date substring used to select the telemetry file
    pub date: String,
    /// Filter to simulate
    pub filter: Filter,
    /// Directory for FITS frames, previews, and the dither log
    pub output_dir: PathBuf,
    /// Write one FITS file per frame
    pub save_frames: bool,
    /// Write one stretched PNG per frame
    pub save_previews: bool,
    /// Write the applied-offset log
    pub save_dither_log: bool,
    /// Base RNG seed; each frame derives its own
    pub rng_seed: Option<u64>,
}

/// Outcome of a jitter run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames_attempted: usize,
    pub frames_failed: usize,
    /// Applied pixel offsets per frame, in synthesis order
    pub offsets: Vec<(f64, f64)>,
}

/// Telemetry-driven simulation runner.
pub struct JitterSim {
    synthesizer: FrameSynthesizer,
    config: JitterSimConfig,
}

impl JitterSim {
    pub fn new(synthesizer: FrameSynthesizer, config: JitterSimConfig) -> Self {
        Self {
            synthesizer,
            config,
        }
    }

    /// Replay the telemetry and synthesize the frame series.
    pub fn run(&self) -> Result<RunSummary, DriverError> {
        let period_s = self.synthesizer.config().exposure.as_secs_f64();
        if period_s <= 0.0 {
            return Err(DriverError::ZeroFramePeriod);
        }

        let path = find_telemetry_file(&self.config.telemetry_dir, &self.config.date)?;
        info!("Using telemetry file {}", path.display());
        let series = SunCenterSeries::from_path(&path)?;

        // Frame times stay inside the sampled span, so the interpolator is
        // never asked to extrapolate.
        let frames = (series.span_s() / period_s).floor() as usize + 1;
        info!(
            "{} telemetry samples over {:.1} s -> {} frames at {:.3} s cadence",
            series.len(),
            series.span_s(),
            frames,
            period_s
        );

        std::fs::create_dir_all(&self.config.output_dir).map_err(|source| {
            DriverError::OutputDir {
                dir: self.config.output_dir.clone(),
                source,
            }
        })?;

        let mut offsets = Vec::with_capacity(frames);
        let mut frames_failed = 0;
        for frame_idx in 0..frames {
            let t_s = frame_idx as f64 * period_s;
            match self.render_frame(frame_idx, t_s, &series) {
                Ok(offset) => offsets.push(offset),
                Err(reason) => {
                    warn!("Frame {frame_idx} at t={t_s:.2} s failed: {reason}");
                    frames_failed += 1;
                }
            }
        }

        if self.config.save_dither_log {
            let log_path = self.config.output_dir.join(format!(
                "{}_{}_dither.txt",
                self.config.filter, self.config.date
            ));
            write_dither_log(&log_path, &offsets).map_err(|source| DriverError::DitherLog {
                path: log_path,
                source,
            })?;
        }

        Ok(RunSummary {
            frames_attempted: frames,
            frames_failed,
            offsets,
        })
    }

    /// Synthesize and persist a single frame, returning the applied pixel
    /// offset. Any failure is reported as a string so the caller can log
    /// it and continue.
    fn render_frame(
        &self,
        frame_idx: usize,
        t_s: f64,
        series: &SunCenterSeries,
    ) -> Result<(f64, f64), String> {
        let (x, y) = series.offset_at(t_s).map_err(|e| e.to_string())?;
        let offset = Offset::new(x * SUN_CENTER_TO_PIXEL, y * SUN_CENTER_TO_PIXEL);

        // Two RNG streams per frame (shot + read noise)
        let seed = self
            .config
            .rng_seed
            .map(|s| s.wrapping_add(2 * frame_idx as u64));
        let frame = self.synthesizer.synthesize(offset, self.config.filter, seed);

        if self.config.save_frames {
            let fits_path = self
                .config
                .output_dir
                .join(format!("{}_{:04}.fits", self.config.filter, frame_idx));
            fits::write_image(&fits_path, &frame.image).map_err(|e| e.to_string())?;
            info!("Frame {frame_idx}: saved {}", fits_path.display());
        }
        if self.config.save_previews {
            let png_path = self
                .config
                .output_dir
                .join(format!("{}_{:04}.png", self.config.filter, frame_idx));
            save_preview(
                &png_path,
                &frame.image,
                PREVIEW_PERCENTILES.0,
                PREVIEW_PERCENTILES.1,
            )
            .map_err(|e| e.to_string())?;
        }

        Ok((offset.del_c, offset.del_r))
    }
}

//! Telemetry-driven jitter simulation.
//!
//! Selects the sun-center telemetry file for an observation date, replays
//! it as a pointing-jitter series, and writes one simulated frame per
//! cadence step.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use stellar_sim::{
    Filter, FrameSynthesizer, JitterSim, JitterSimConfig, PsfImage, SynthesisConfig,
};

/// Command line arguments for the jitter simulator
#[derive(Parser, Debug)]
#[command(version, about = "Telemetry-driven stellar observation simulator")]
struct Args {
    /// Directory containing .suncentre telemetry files
    #[arg(long)]
    telemetry_dir: PathBuf,

    /// Observation date used to select the telemetry file (YYYY-MM-DD)
    #[arg(long)]
    date: String,

    /// Filter to simulate (NB01-NB08, BB01-BB03)
    #[arg(long, default_value = "NB07")]
    filter: Filter,

    /// Reference PSF FITS file
    #[arg(long)]
    psf: PathBuf,

    /// Per-frame exposure (and frame cadence) in seconds
    #[arg(long, default_value_t = 1.0)]
    exposure: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 320)]
    height: usize,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 320)]
    width: usize,

    /// Bias level in photo-electrons
    #[arg(long, default_value_t = 1500.0)]
    bias: f64,

    /// Extra shift of the read-noise mean in photo-electrons
    #[arg(long, default_value_t = 5.0)]
    pedestal: f64,

    /// Output directory for frames, previews, and the dither log
    #[arg(long, default_value = "products")]
    output_dir: PathBuf,

    /// Save one FITS file per frame
    #[arg(long, default_value_t = false)]
    save: bool,

    /// Save one stretched PNG preview per frame
    #[arg(long, default_value_t = false)]
    previews: bool,

    /// Save the applied-offset dither log
    #[arg(long, default_value_t = false)]
    dither_log: bool,

    /// Base random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    println!("Stellar Jitter Simulator");
    println!("========================");
    println!("Date: {}", args.date);
    println!("Filter: {}", args.filter);
    println!("Exposure: {:.3} s", args.exposure);
    println!("Canvas: {}x{}", args.height, args.width);
    println!("Output: {}", args.output_dir.display());

    let psf = PsfImage::from_fits(&args.psf)?;
    println!(
        "Loaded PSF {}x{} (sum {:.3})",
        psf.dim().0,
        psf.dim().1,
        psf.total()
    );

    let synthesizer = FrameSynthesizer::new(
        psf,
        SynthesisConfig {
            height: args.height,
            width: args.width,
            bias_e: args.bias,
            bias_pedestal_e: args.pedestal,
            exposure: Duration::from_secs_f64(args.exposure),
            ..SynthesisConfig::default()
        },
    );

    let sim = JitterSim::new(
        synthesizer,
        JitterSimConfig {
            telemetry_dir: args.telemetry_dir,
            date: args.date,
            filter: args.filter,
            output_dir: args.output_dir,
            save_frames: args.save,
            save_previews: args.previews,
            save_dither_log: args.dither_log,
            rng_seed: args.seed,
        },
    );

    let summary = sim.run()?;
    println!(
        "Sequence completed: {} frames, {} failed.",
        summary.frames_attempted, summary.frames_failed
    );
    Ok(())
}

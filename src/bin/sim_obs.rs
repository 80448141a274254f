//! Single-frame and random-pointing observation simulator.
//!
//! Default mode renders one frame per requested filter at a fixed offset.
//! With `--frames` it instead renders a series with Gaussian random
//! pointing, scaling the PSF to a fixed peak intensity.

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::path::PathBuf;
use std::time::Duration;

use stellar_sim::io::{fits, preview};
use stellar_sim::{Filter, FrameSynthesizer, Offset, PsfImage, SynthesisConfig};

/// Command line arguments for the observation simulator
#[derive(Parser, Debug)]
#[command(version, about = "Mock stellar observation frame generator")]
struct Args {
    /// Reference PSF FITS file
    #[arg(long)]
    psf: PathBuf,

    /// Filter to simulate; omit to render every filter
    #[arg(long)]
    filter: Option<Filter>,

    /// Star offset from frame center along columns, in pixels
    #[arg(long, default_value_t = 0.0)]
    del_c: f64,

    /// Star offset from frame center along rows, in pixels
    #[arg(long, default_value_t = 0.0)]
    del_r: f64,

    /// Exposure in seconds
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

    /// Render a random-pointing series of this many frames instead of
    /// fixed-offset per-filter frames
    #[arg(long)]
    frames: Option<usize>,

    /// RMS of the random pointing fluctuation in pixels (series mode)
    #[arg(long, default_value_t = 35.0)]
    rms_pos: f64,

    /// PSF peak intensity in photo-electrons (series mode)
    #[arg(long, default_value_t = 66.0)]
    peak_intensity: f64,

    /// Output directory
    #[arg(long, default_value = "products")]
    output_dir: PathBuf,

    /// Also save stretched PNG previews
    #[arg(long, default_value_t = false)]
    png: bool,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let psf = PsfImage::from_fits(&args.psf)?;
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
    std::fs::create_dir_all(&args.output_dir)?;

    match args.frames {
        Some(frames) => random_pointing_series(&args, &synthesizer, frames),
        None => fixed_offset_frames(&args, &synthesizer),
    }
}

/// One frame per filter at the requested fixed offset.
fn fixed_offset_frames(
    args: &Args,
    synthesizer: &FrameSynthesizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let filters: Vec<Filter> = match args.filter {
        Some(filter) => vec![filter],
        None => Filter::ALL.to_vec(),
    };
    let offset = Offset::new(args.del_c, args.del_r);

    for (idx, filter) in filters.iter().enumerate() {
        let seed = args.seed.map(|s| s.wrapping_add(2 * idx as u64));
        let frame = synthesizer.synthesize(offset, *filter, seed);

        let fits_path = args.output_dir.join(format!("{filter}.fits"));
        fits::write_image(&fits_path, &frame.image)?;
        info!("Saved {}", fits_path.display());
        if args.png {
            preview::save_preview(
                args.output_dir.join(format!("{filter}.png")),
                &frame.image,
                1.0,
                99.5,
            )?;
        }
        println!("{filter}");
    }
    println!("Sequence completed.");
    Ok(())
}

/// Frame series with Gaussian random pointing at fixed peak intensity.
fn random_pointing_series(
    args: &Args,
    synthesizer: &FrameSynthesizer,
    frames: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = args.seed.unwrap_or(thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);
    let pointing = Normal::new(0.0, args.rms_pos)?;

    for frame_idx in 0..frames {
        let offset = Offset::new(pointing.sample(&mut rng), pointing.sample(&mut rng));
        let frame_seed = args.seed.map(|s| s.wrapping_add(1 + 2 * frame_idx as u64));
        let frame = synthesizer.synthesize_peak(offset, args.peak_intensity, frame_seed);

        let fits_path = args.output_dir.join(format!("{frame_idx:04}.fits"));
        fits::write_image(&fits_path, &frame.image)?;
        if args.png {
            preview::save_preview(
                args.output_dir.join(format!("{frame_idx:04}.png")),
                &frame.image,
                1.0,
                99.5,
            )?;
        }
        println!("{frame_idx:04}.fits");
    }
    println!("Sequence completed.");
    Ok(())
}

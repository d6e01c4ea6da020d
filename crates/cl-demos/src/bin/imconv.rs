//! Grayscale convolution followed by erosion, both on the device.

use cl_demos::{
    cli::{self, SessionArgs},
    imaging, ops,
    reference::{Filter2d, StructuringElement},
    Result, Session,
};

use clap::Parser;
use std::{path::PathBuf, process::ExitCode, time::Instant};

/// Convolve a grayscale image with a 5x5 filter, then erode it with a 3x3 square
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Source image
    input: PathBuf,

    /// Destination image
    output: PathBuf,

    /// Use a normalised 5x5 Gaussian of this sigma instead of the edge filter
    #[arg(long)]
    sigma: Option<f32>,

    #[command(flatten)]
    session: SessionArgs,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging();
    cli::finish(run(&args))
}

fn run(args: &Cli) -> Result<()> {
    let filter = match args.sigma {
        Some(sigma) => Filter2d::gaussian(sigma, 5)?,
        None => Filter2d::edge_5x5(),
    };
    let se = StructuringElement::square(3);

    let gray = imaging::load_gray(&args.input)?;
    let (width, height) = gray.dimensions();

    let session = Session::bootstrap(&args.session.config(), "conv.cl")?;

    let start = Instant::now();
    let convolved = ops::convolve_gray(&session, gray.as_raw(), width, height, &filter)?;
    let conv_time = start.elapsed();
    let eroded = ops::erode_gray(&session, &convolved, width, height, &se)?;
    let total = start.elapsed();

    println!("Convolution done in {:.6} s", conv_time.as_secs_f64());
    println!("Erosion done in {:.6} s", (total - conv_time).as_secs_f64());
    println!(
        "Convolution & erosion done in {:.6} s on {}",
        total.as_secs_f64(),
        session.device_name()
    );

    imaging::save_gray_as_rgba(&args.output, width, height, eroded)
}

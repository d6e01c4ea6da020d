//! Copies an image through an OpenCL device buffer.

use cl_demos::{
    cli::{self, SessionArgs},
    imaging, ops, Result, Session,
};

use clap::Parser;
use log::info;
use std::{path::PathBuf, process::ExitCode};

/// Copy an image through an OpenCL device buffer
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Source image
    input: PathBuf,

    /// Destination image
    #[arg(default_value = "copy.png")]
    output: PathBuf,

    #[command(flatten)]
    session: SessionArgs,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging();
    cli::finish(run(&args))
}

fn run(args: &Cli) -> Result<()> {
    let image = imaging::load_rgba(&args.input)?;
    let (width, height) = image.dimensions();

    let session = Session::bootstrap(&args.session.config(), "copy.cl")?;
    let copied = ops::copy_rgba(&session, image.as_raw(), width, height)?;

    imaging::save_rgba(&args.output, width, height, copied)?;
    info!("Wrote {}", args.output.display());
    Ok(())
}

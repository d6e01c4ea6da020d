//! Looks for a platform of a given OpenCL version and lists its GPUs.

use cl_demos::{
    cli,
    session::{self, PlatformInfo},
    PlatformFilter, Result,
};

use clap::Parser;
use std::process::ExitCode;

/// Find the first platform reporting a given OpenCL version and list its GPU devices
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Text the platform version string must contain
    #[arg(long, value_name = "SUBSTR", default_value = "OpenCL 2.")]
    cl_version: String,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging();
    cli::finish(run(&args))
}

fn run(args: &Cli) -> Result<()> {
    let platform = session::select_platform(&PlatformFilter::VersionContains(args.cl_version.clone()))?;
    let info = PlatformInfo::query(&platform);

    println!("Platform: {}", info.name);
    println!("Vendor:   {}", platform.vendor().unwrap_or_default());
    println!("Version:  {}", info.version);

    let devices = session::gpu_devices(&platform);
    if devices.is_empty() {
        println!("No GPU device.");
    }
    for (i, device) in devices.iter().enumerate() {
        println!(
            "Device {}: {} ({}, {} compute units)",
            i,
            device.name()?,
            device.version()?,
            device.max_compute_units()?
        );
    }
    Ok(())
}

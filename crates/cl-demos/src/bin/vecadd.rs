//! Vector addition on the device versus the host, over growing sizes.

use cl_demos::{
    bench::{self, BenchConfig},
    cli::{self, SessionArgs},
    Result, Session,
};

use clap::Parser;
use std::{io, process::ExitCode};

/// Vector addition benchmark, OpenCL versus plain CPU loop
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// First vector length
    #[arg(long, default_value_t = bench::DEFAULT_START)]
    start_size: usize,

    /// Stop before vectors reach this length
    #[arg(long, default_value_t = bench::DEFAULT_LIMIT)]
    max_size: usize,

    /// Timed rounds per size
    #[arg(short, long, default_value_t = bench::DEFAULT_REPETITIONS)]
    repetitions: usize,

    #[command(flatten)]
    session: SessionArgs,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging();
    cli::finish(run(&args))
}

fn run(args: &Cli) -> Result<()> {
    let config = BenchConfig {
        start: args.start_size,
        limit: args.max_size,
        repetitions: args.repetitions,
    };
    let session = Session::bootstrap(&args.session.config(), "add.cl")?;

    let stdout = io::stdout();
    bench::run(&session, &config, &mut stdout.lock())?;
    Ok(())
}

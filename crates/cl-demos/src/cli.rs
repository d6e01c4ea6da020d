//! Pieces every demo binary shares: session flags, logger setup and the
//! error → exit status translation.

use crate::{
    config::{DEFAULT_KERNEL_DIR, KERNEL_DIR_ENV},
    PlatformFilter, Result, SessionConfig,
};

use clap::Args;
use env_logger::Env;
use log::error;
use std::{path::PathBuf, process::ExitCode};

#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Directory holding the OpenCL kernel sources
    #[arg(long, value_name = "DIR", env = KERNEL_DIR_ENV, default_value = DEFAULT_KERNEL_DIR)]
    pub kernel_dir: PathBuf,

    /// Use the first platform whose name contains SUBSTR (case-insensitive)
    #[arg(long, value_name = "SUBSTR", conflicts_with = "cl_version")]
    pub platform: Option<String>,

    /// Use the first platform whose version string contains SUBSTR, e.g. "OpenCL 2."
    #[arg(long, value_name = "SUBSTR")]
    pub cl_version: Option<String>,
}

impl SessionArgs {
    pub fn config(&self) -> SessionConfig {
        let platform = match (&self.platform, &self.cl_version) {
            (Some(name), _) => PlatformFilter::NameContains(name.clone()),
            (None, Some(version)) => PlatformFilter::VersionContains(version.clone()),
            (None, None) => PlatformFilter::First,
        };
        SessionConfig::default()
            .with_kernel_dir(&self.kernel_dir)
            .with_platform(platform)
    }
}

/// Diagnostics go to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}

/// Logs `result`'s error, if any, and maps it to the process exit status.
pub fn finish(result: Result<()>) -> ExitCode {
    #[cfg(feature = "metrics")]
    crate::metrics::summary();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

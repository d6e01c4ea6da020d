//! Small OpenCL demonstration programs built around one shared compute
//! session: platform/device discovery, program build from a kernel file,
//! typed device buffers, image copy/convolution/erosion and a vector-add
//! benchmark.

// ─── Modules ─────────────────────────────────────────────────────────
pub mod bench;
pub mod buffer;
pub mod cli;
pub mod config;
pub mod imaging;
pub mod ops;
pub mod reference;
pub mod session;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use buffer::{Access, DeviceBuffer, ReadOnly, WriteOnly};
pub use config::{PlatformFilter, SessionConfig};
pub use session::Session;

use std::{io, path::PathBuf};

// ─── Error types ─────────────────────────────────────────────────────

/// Failures while bringing up a compute session. All of them are fatal for
/// the demo programs.
#[derive(thiserror::Error, Debug)]
pub enum BootstrapError {
    #[error("No platform found.")]
    NoPlatform,
    #[error("No platform with {0} found.")]
    NoMatchingPlatform(String),
    #[error("No GPU device found on platform '{0}'.")]
    NoDevice(String),
    #[error("Could not load kernel source code located in {}: {source}", .path.display())]
    KernelSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not build program:\n\tDevice name: {device}\n\tStatus code: {status}\nLog: {log}")]
    Build {
        device: String,
        status: i32,
        log: String,
    },
    #[error("OpenCL API error: {0}")]
    Api(i32),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    #[error("OpenCL API error: {0}")]
    Api(i32),
    #[error("Invalid buffer size: {0}")]
    InvalidSize(usize),
    #[error("Host slice holds {host} elements, device buffer {device}")]
    LengthMismatch { host: usize, device: usize },
    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}x{channels}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Result mismatch at index {index}: expected {expected}, got {actual}")]
    Verification {
        index: usize,
        expected: i64,
        actual: i64,
    },
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<opencl3::error_codes::ClError> for BootstrapError {
    #[inline]
    fn from(err: opencl3::error_codes::ClError) -> Self {
        BootstrapError::Api(err.0)
    }
}

impl From<opencl3::error_codes::ClError> for Error {
    #[inline]
    fn from(err: opencl3::error_codes::ClError) -> Self {
        Error::Api(err.0)
    }
}

impl Error {
    /// True when the error only says that this machine has no usable
    /// OpenCL platform or GPU device. Raw API failures never count.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Error::Bootstrap(
                BootstrapError::NoPlatform
                    | BootstrapError::NoMatchingPlatform(_)
                    | BootstrapError::NoDevice(_)
            )
        )
    }
}

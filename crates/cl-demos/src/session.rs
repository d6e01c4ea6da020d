//! Compute session bootstrap: platform → device → compiled program, plus the
//! context and command queue every demo dispatches on.

use crate::{BootstrapError, PlatformFilter, Result, SessionConfig};

use log::{debug, info, warn};
use opencl3::{
    command_queue::CommandQueue,
    context::Context,
    device::{Device, CL_DEVICE_TYPE_GPU},
    kernel::Kernel,
    platform::{get_platforms, Platform},
    program::Program,
};
use std::{fs, path::Path};

#[cfg(feature = "metrics")]
use crate::metrics::record;
#[cfg(feature = "metrics")]
use std::time::Instant;

/// Returned by the ICD loader when no vendor driver is installed.
const CL_PLATFORM_NOT_FOUND_KHR: i32 = -1001;

/// Name and version string reported by a platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformInfo {
    pub name: String,
    pub version: String,
}

impl PlatformInfo {
    pub fn query(platform: &Platform) -> Self {
        Self {
            name: platform.name().unwrap_or_else(|_| {
                warn!("platform name query failed");
                String::new()
            }),
            version: platform.version().unwrap_or_default(),
        }
    }
}

/// Applies the selection policy to an enumeration. An empty enumeration is
/// always `NoPlatform`, whatever the filter.
pub fn choose_platform<P>(
    candidates: impl IntoIterator<Item = (P, PlatformInfo)>,
    filter: &PlatformFilter,
) -> Result<(P, PlatformInfo), BootstrapError> {
    let mut candidates = candidates.into_iter().peekable();
    if candidates.peek().is_none() {
        return Err(BootstrapError::NoPlatform);
    }
    candidates
        .find(|(_, info)| filter.matches(&info.name, &info.version))
        .ok_or_else(|| BootstrapError::NoMatchingPlatform(filter.to_string()))
}

pub fn select_platform(filter: &PlatformFilter) -> Result<Platform, BootstrapError> {
    let platforms = match get_platforms() {
        Ok(platforms) => platforms,
        Err(err) if err.0 == CL_PLATFORM_NOT_FOUND_KHR => Vec::new(),
        Err(err) => return Err(err.into()),
    };
    let (platform, info) = choose_platform(
        platforms.into_iter().map(|p| {
            let info = PlatformInfo::query(&p);
            (p, info)
        }),
        filter,
    )?;
    info!("Using platform {} ({})", info.name, info.version);
    Ok(platform)
}

/// All GPU-class devices of `platform`. Enumeration failures count as "none".
pub fn gpu_devices(platform: &Platform) -> Vec<Device> {
    match platform.get_devices(CL_DEVICE_TYPE_GPU) {
        Ok(ids) => ids.into_iter().map(Device::new).collect(),
        Err(err) => {
            debug!("GPU device enumeration failed with code {}", err.0);
            Vec::new()
        }
    }
}

/// Device policy: the first device in enumeration order, `None` when there is
/// nothing to pick.
pub fn choose_device<D>(devices: impl IntoIterator<Item = D>) -> Option<D> {
    devices.into_iter().next()
}

/// First GPU device of `platform`. A missing device is only logged here; the
/// caller decides whether that is fatal.
pub fn select_device(platform: &Platform) -> Option<Device> {
    let device = choose_device(gpu_devices(platform));
    match &device {
        Some(device) => info!(
            "Using device: {}",
            device.name().unwrap_or_else(|_| "<unnamed>".to_string())
        ),
        None => warn!("No device found."),
    }
    device
}

pub fn load_source(path: &Path) -> Result<String, BootstrapError> {
    fs::read_to_string(path).map_err(|source| BootstrapError::KernelSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads `source_path` and builds it for `device` only.
pub fn build_program(
    context: &Context,
    device: &Device,
    source_path: &Path,
) -> Result<Program, BootstrapError> {
    let source = load_source(source_path)?;
    let mut program = Program::create_from_source(context, &source)?;
    if let Err(err) = program.build(&[device.id()], "") {
        debug!("clBuildProgram returned {}", err.0);
        return Err(BootstrapError::Build {
            device: device.name().unwrap_or_default(),
            status: program.get_build_status(device.id())?,
            log: program.get_build_log(device.id())?,
        });
    }
    debug!("built {}", source_path.display());
    Ok(program)
}

pub struct Session {
    device: Device,
    context: Context,
    queue: CommandQueue,
    program: Program,
}

impl Session {
    /// Platform, device, context, program from `kernel_file` (relative to the
    /// configured kernel directory) and an in-order queue on that device.
    pub fn bootstrap(config: &SessionConfig, kernel_file: &str) -> Result<Self, BootstrapError> {
        #[cfg(feature = "metrics")]
        let t = Instant::now();

        let platform = select_platform(&config.platform)?;
        let device = select_device(&platform)
            .ok_or_else(|| BootstrapError::NoDevice(platform.name().unwrap_or_default()))?;
        let context = Context::from_device(&device)?;
        let program = build_program(&context, &device, &config.kernel_path(kernel_file))?;
        let queue = CommandQueue::create(&context, device.id(), 0)?;

        #[cfg(feature = "metrics")]
        record("bootstrap", t);

        Ok(Self {
            device,
            context,
            queue,
            program,
        })
    }

    pub fn kernel(&self, name: &str) -> Result<Kernel> {
        Ok(Kernel::create(&self.program, name)?)
    }

    pub fn device_name(&self) -> String {
        self.device.name().unwrap_or_default()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }
}

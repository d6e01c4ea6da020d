use std::{
    fmt,
    path::{Path, PathBuf},
};

pub const DEFAULT_KERNEL_DIR: &str = "kernels";
pub const KERNEL_DIR_ENV: &str = "CL_DEMOS_KERNEL_DIR";

/// Which platform the session picks out of the enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlatformFilter {
    /// First platform in enumeration order.
    #[default]
    First,
    /// First platform whose name contains the text, ignoring ASCII case.
    NameContains(String),
    /// First platform whose version string contains the text, e.g. `"OpenCL 2."`.
    VersionContains(String),
}

impl PlatformFilter {
    pub fn matches(&self, name: &str, version: &str) -> bool {
        match self {
            PlatformFilter::First => true,
            PlatformFilter::NameContains(substr) => name
                .to_ascii_lowercase()
                .contains(&substr.to_ascii_lowercase()),
            PlatformFilter::VersionContains(substr) => version.contains(substr.as_str()),
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFilter::First => f.write_str("any platform"),
            PlatformFilter::NameContains(s) => write!(f, "name containing {s:?}"),
            PlatformFilter::VersionContains(s) => write!(f, "version containing {s:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Directory the kernel source files are loaded from.
    pub kernel_dir: PathBuf,
    pub platform: PlatformFilter,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            kernel_dir: PathBuf::from(DEFAULT_KERNEL_DIR),
            platform: PlatformFilter::First,
        }
    }
}

impl SessionConfig {
    pub fn with_kernel_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.kernel_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_platform(mut self, platform: PlatformFilter) -> Self {
        self.platform = platform;
        self
    }

    pub fn kernel_path(&self, file: &str) -> PathBuf {
        self.kernel_dir.join(file)
    }
}

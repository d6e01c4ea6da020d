mod common;

use cl_demos::{
    session::{self, choose_device, choose_platform, PlatformInfo},
    BootstrapError, Error, PlatformFilter, Session, SessionConfig,
};
use std::fs;
use tempfile::tempdir;

fn info(name: &str, version: &str) -> PlatformInfo {
    PlatformInfo {
        name: name.into(),
        version: version.into(),
    }
}

fn platforms() -> Vec<(u32, PlatformInfo)> {
    vec![
        (0, info("Intel(R) OpenCL", "OpenCL 3.0 LINUX")),
        (1, info("NVIDIA CUDA", "OpenCL 3.0 CUDA 12.2.0")),
        (2, info("Portable Computing Language", "OpenCL 2.1 pocl 1.8")),
    ]
}

#[test]
fn empty_enumeration_is_no_platform_for_every_filter() {
    for filter in [
        PlatformFilter::First,
        PlatformFilter::NameContains("nvidia".into()),
        PlatformFilter::VersionContains("OpenCL 2.".into()),
    ] {
        let res = choose_platform(Vec::<(u32, PlatformInfo)>::new(), &filter);
        assert!(matches!(res, Err(BootstrapError::NoPlatform)), "{filter}");
    }
}

#[test]
fn first_platform_wins_without_constraint() {
    let (id, _) = choose_platform(platforms(), &PlatformFilter::First).unwrap();
    assert_eq!(id, 0);
}

#[test]
fn constraints_pick_first_match() {
    let (id, _) = choose_platform(platforms(), &PlatformFilter::NameContains("nvidia".into())).unwrap();
    assert_eq!(id, 1);
    let (id, info) =
        choose_platform(platforms(), &PlatformFilter::VersionContains("OpenCL 2.".into())).unwrap();
    assert_eq!(id, 2);
    assert_eq!(info.name, "Portable Computing Language");
}

#[test]
fn unmatched_constraint_is_an_error() {
    let res = choose_platform(platforms(), &PlatformFilter::VersionContains("OpenCL 1.2".into()));
    match res {
        Err(BootstrapError::NoMatchingPlatform(what)) => assert!(what.contains("OpenCL 1.2")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn empty_device_enumeration_selects_nothing() {
    assert_eq!(choose_device(Vec::<u32>::new()), None);
}

#[test]
fn first_device_wins() {
    assert_eq!(choose_device(vec![7u32, 8]), Some(7));
}

#[test]
fn only_missing_hardware_counts_as_unavailable() {
    assert!(Error::from(BootstrapError::NoPlatform).is_unavailable());
    assert!(Error::from(BootstrapError::NoMatchingPlatform("any platform".into())).is_unavailable());
    assert!(Error::from(BootstrapError::NoDevice("pocl".into())).is_unavailable());

    // CL_OUT_OF_RESOURCES from a real driver must fail the test, not skip it
    assert!(!Error::from(BootstrapError::Api(-5)).is_unavailable());
    assert!(!Error::Api(-5).is_unavailable());
    let build = BootstrapError::Build {
        device: "gpu".into(),
        status: -2,
        log: String::new(),
    };
    assert!(!Error::from(build).is_unavailable());
}

#[test]
fn missing_kernel_source_names_the_path() {
    let path = common::kernel_dir().join("does_not_exist.cl");
    match session::load_source(&path) {
        Err(err @ BootstrapError::KernelSource { .. }) => {
            assert!(err.to_string().contains("does_not_exist.cl"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn shipped_kernels_define_their_entry_points() {
    for (file, entries) in [
        ("copy.cl", &["copy_buff"][..]),
        ("conv.cl", &["gray_conv_buff", "erode"][..]),
        ("add.cl", &["simple_add"][..]),
    ] {
        let src = session::load_source(&common::kernel_dir().join(file)).unwrap();
        for entry in entries {
            assert!(src.contains(&format!("__kernel void {entry}(")), "{file}: {entry}");
        }
    }
}

#[test]
fn bootstrap_fails_on_missing_kernel_dir() {
    let dir = tempdir().expect("tempdir");
    let cfg = SessionConfig::default().with_kernel_dir(dir.path().join("no-such-dir"));
    // without a GPU the platform/device step fails first; either way no session
    match Session::bootstrap(&cfg, "copy.cl") {
        Err(BootstrapError::KernelSource { path, .. }) => assert!(path.ends_with("copy.cl")),
        Err(BootstrapError::NoPlatform | BootstrapError::NoDevice(_)) => {}
        Err(other) => panic!("unexpected {other}"),
        Ok(_) => panic!("bootstrap succeeded without kernel sources"),
    }
}

#[test]
fn broken_kernel_reports_build_log() {
    if common::session("add.cl").is_none() {
        return;
    }
    let tmp = tempdir().expect("tempdir");
    let dir = tmp.path().join("broken-kernels");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("broken.cl"),
        "__kernel void broken(__global int *a) { a[0] = undeclared_name; }\n",
    )
    .unwrap();

    let cfg = common::config().with_kernel_dir(&dir);
    match Session::bootstrap(&cfg, "broken.cl") {
        Err(BootstrapError::Build { device, status, log }) => {
            assert!(!device.is_empty());
            assert_ne!(status, 0);
            assert!(!log.is_empty());
        }
        Err(other) => panic!("unexpected {other}"),
        Ok(_) => panic!("broken kernel built"),
    }
}

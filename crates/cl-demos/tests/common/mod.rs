#![allow(dead_code)]

use cl_demos::{Error, Session, SessionConfig};
use std::path::PathBuf;

pub fn kernel_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("kernels")
}

pub fn config() -> SessionConfig {
    SessionConfig::default().with_kernel_dir(kernel_dir())
}

/// Session on the first GPU, or `None` when this machine has none.
pub fn session(kernel_file: &str) -> Option<Session> {
    match Session::bootstrap(&config(), kernel_file) {
        Ok(session) => Some(session),
        Err(err) => {
            let err = Error::from(err);
            assert!(err.is_unavailable(), "bootstrap failed: {err}");
            eprintln!("skipping: {err}");
            None
        }
    }
}

/// Deterministic gradient with some texture, `width * height` bytes.
pub fn gray_pattern(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .map(|i| {
            let (x, y) = (i % width, i / width);
            ((x * 7 + y * 13 + (x * y) % 31) % 256) as u8
        })
        .collect()
}

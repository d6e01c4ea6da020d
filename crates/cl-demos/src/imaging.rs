use crate::{Error, Result};

use image::{DynamicImage, GrayImage, RgbaImage};
use log::info;
use std::path::Path;

/// Decodes `path` and converts it to 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)?.into_rgba8();
    let (width, height) = image.dimensions();
    info!(
        "Loaded {} - {}x{} - {:.3} MB",
        path.display(),
        width,
        height,
        megabytes(image.as_raw().len())
    );
    Ok(image)
}

/// Decodes `path` and converts it to 8-bit luma.
pub fn load_gray(path: &Path) -> Result<GrayImage> {
    let image = image::open(path)?.into_luma8();
    let (width, height) = image.dimensions();
    info!(
        "Loaded {} - {}x{} - {:.3} MB",
        path.display(),
        width,
        height,
        megabytes(image.as_raw().len())
    );
    Ok(image)
}

pub fn save_rgba(path: &Path, width: u32, height: u32, pixels: Vec<u8>) -> Result<()> {
    let actual = pixels.len();
    let image = RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| dimension_mismatch(width, height, 4, actual))?;
    image.save(path)?;
    Ok(())
}

/// Writes a single-channel result, expanded to RGBA.
pub fn save_gray_as_rgba(path: &Path, width: u32, height: u32, pixels: Vec<u8>) -> Result<()> {
    let actual = pixels.len();
    let gray = GrayImage::from_raw(width, height, pixels)
        .ok_or_else(|| dimension_mismatch(width, height, 1, actual))?;
    DynamicImage::ImageLuma8(gray).into_rgba8().save(path)?;
    Ok(())
}

pub fn megabytes(bytes: usize) -> f64 {
    bytes as f64 / 1e6
}

fn dimension_mismatch(width: u32, height: u32, channels: usize, actual: usize) -> Error {
    Error::DimensionMismatch {
        width,
        height,
        channels,
        expected: width as usize * height as usize * channels,
        actual,
    }
}

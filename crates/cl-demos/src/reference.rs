//! Host-side versions of the device operations, and the filters they take.
//! The OpenCL kernels in `kernels/` follow the same border rules, so the
//! results can be compared pixel by pixel.

use crate::{Error, Result};

/// 5×5 edge-emphasis filter the convolution demo runs by default.
#[rustfmt::skip]
pub const EDGE_FILTER_5X5: [f32; 25] = [
     3.0,  1.0, -1.0,  1.0,  3.0,
     1.0, -2.0, -2.0, -2.0,  1.0,
    -1.0, -2.0, -3.0, -2.0, -1.0,
     1.0, -2.0, -2.0, -2.0,  1.0,
     3.0,  1.0, -1.0,  1.0,  3.0,
];

/// Row-major convolution weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter2d {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl Filter2d {
    pub fn new(width: usize, height: usize, weights: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || weights.len() != width * height {
            return Err(Error::InvalidFilter(format!(
                "{} weights for a {width}x{height} filter",
                weights.len()
            )));
        }
        Ok(Self { width, height, weights })
    }

    pub fn edge_5x5() -> Self {
        Self {
            width: 5,
            height: 5,
            weights: EDGE_FILTER_5X5.to_vec(),
        }
    }

    /// Square Gaussian of side `size`, normalised to sum to one.
    pub fn gaussian(sigma: f32, size: usize) -> Result<Self> {
        if !(sigma > 0.0) || size == 0 {
            return Err(Error::InvalidFilter(format!(
                "gaussian with sigma {sigma} and size {size}"
            )));
        }
        let mean = (size / 2) as f32;
        let mut weights: Vec<f32> = (0..size * size)
            .map(|i| {
                let x = (i % size) as f32;
                let y = (i / size) as f32;
                let dx = (x - mean) / sigma;
                let dy = (y - mean) / sigma;
                (-0.5 * (dx * dx + dy * dy)).exp()
                    / (2.0 * std::f32::consts::PI * sigma * sigma)
            })
            .collect();
        let sum: f32 = weights.iter().sum();
        weights.iter_mut().for_each(|w| *w /= sum);
        Ok(Self {
            width: size,
            height: size,
            weights,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Square mask for erosion; non-zero cells select neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    size: usize,
    cells: Vec<i32>,
}

impl StructuringElement {
    pub fn new(size: usize, cells: Vec<i32>) -> Result<Self> {
        if size == 0 || cells.len() != size * size {
            return Err(Error::InvalidFilter(format!(
                "{} cells for a {size}x{size} structuring element",
                cells.len()
            )));
        }
        Ok(Self { size, cells })
    }

    /// All-ones square.
    pub fn square(size: usize) -> Self {
        Self {
            size,
            cells: vec![1; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }
}

/// Correlates `pixels` with `filter`. Pixels whose window does not fit in the
/// image are copied unchanged; the others are rounded and saturated to `u8`.
pub fn convolve_gray(pixels: &[u8], width: usize, height: usize, filter: &Filter2d) -> Vec<u8> {
    assert_eq!(pixels.len(), width * height, "pixel buffer does not match dimensions");
    let (fw, fh) = (filter.width, filter.height);
    let (rx, ry) = (fw / 2, fh / 2);
    let mut out = pixels.to_vec();

    for y in 0..height {
        for x in 0..width {
            if x < rx || y < ry || x + (fw - 1 - rx) >= width || y + (fh - 1 - ry) >= height {
                continue;
            }
            let mut sum = 0.0f32;
            for j in 0..fh {
                let row = (y + j - ry) * width;
                for i in 0..fw {
                    sum += pixels[row + x + i - rx] as f32 * filter.weights[j * fw + i];
                }
            }
            out[y * width + x] = saturate_u8(sum);
        }
    }
    out
}

/// Minimum over the neighbours selected by `se`, centred on each pixel.
/// Neighbours outside the image are skipped.
pub fn erode_gray(pixels: &[u8], width: usize, height: usize, se: &StructuringElement) -> Vec<u8> {
    assert_eq!(pixels.len(), width * height, "pixel buffer does not match dimensions");
    let r = (se.size / 2) as isize;
    let mut out = vec![0u8; pixels.len()];

    for y in 0..height as isize {
        for x in 0..width as isize {
            let mut min = u8::MAX;
            for j in 0..se.size as isize {
                for i in 0..se.size as isize {
                    if se.cells[(j as usize) * se.size + i as usize] == 0 {
                        continue;
                    }
                    let (nx, ny) = (x + i - r, y + j - r);
                    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                        continue;
                    }
                    min = min.min(pixels[ny as usize * width + nx as usize]);
                }
            }
            out[y as usize * width + x as usize] = min;
        }
    }
    out
}

/// Element-wise wrapping sum, the same arithmetic `simple_add` does.
pub fn vector_add(a: &[i32], b: &[i32], out: &mut [i32]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x.wrapping_add(y);
    }
}

fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

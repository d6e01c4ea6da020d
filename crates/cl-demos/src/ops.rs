//! Device operations. Each one uploads its inputs into read-only buffers,
//! dispatches once over an explicit range and reads the output back into a
//! vector the caller owns.

use crate::{
    reference::{Filter2d, StructuringElement},
    DeviceBuffer, Error, ReadOnly, Result, Session, WriteOnly,
};

use opencl3::kernel::{ExecuteKernel, Kernel};

#[cfg(feature = "metrics")]
use crate::metrics::record;
#[cfg(feature = "metrics")]
use std::time::Instant;

fn check_dims(pixels: &[u8], width: u32, height: u32, channels: usize) -> Result<usize> {
    let expected = width as usize * height as usize * channels;
    if pixels.len() != expected || expected == 0 {
        return Err(Error::DimensionMismatch {
            width,
            height,
            channels,
            expected,
            actual: pixels.len(),
        });
    }
    Ok(expected)
}

/// RGBA copy through the device, one work item per channel byte.
pub fn copy_rgba(session: &Session, pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let len = check_dims(pixels, width, height, 4)?;
    let input = DeviceBuffer::<u8, ReadOnly>::from_host(session.context(), pixels)?;
    let output = DeviceBuffer::<u8, WriteOnly>::uninit(session.context(), len)?;
    let kernel = session.kernel("copy_buff")?;

    #[cfg(feature = "metrics")]
    let t = Instant::now();

    unsafe {
        ExecuteKernel::new(&kernel)
            .set_arg(input.raw())
            .set_arg(&width)
            .set_arg(output.raw())
            .set_global_work_sizes(&[width as usize, height as usize, 4])
            .enqueue_nd_range(session.queue())?;
    }

    #[cfg(feature = "metrics")]
    record("copy_buff", t);

    output.read_to_vec(session.queue())
}

/// Grayscale convolution with `filter`; see [`crate::reference::convolve_gray`]
/// for the border rule.
pub fn convolve_gray(
    session: &Session,
    pixels: &[u8],
    width: u32,
    height: u32,
    filter: &Filter2d,
) -> Result<Vec<u8>> {
    let len = check_dims(pixels, width, height, 1)?;
    let input = DeviceBuffer::<u8, ReadOnly>::from_host(session.context(), pixels)?;
    let weights = DeviceBuffer::<f32, ReadOnly>::from_host(session.context(), filter.weights())?;
    let output = DeviceBuffer::<u8, WriteOnly>::uninit(session.context(), len)?;
    let kernel = session.kernel("gray_conv_buff")?;

    // scalar kernel arguments are cl_uint, never size_t
    let (fw, fh) = (filter.width() as u32, filter.height() as u32);

    #[cfg(feature = "metrics")]
    let t = Instant::now();

    unsafe {
        ExecuteKernel::new(&kernel)
            .set_arg(input.raw())
            .set_arg(&width)
            .set_arg(&height)
            .set_arg(weights.raw())
            .set_arg(&fw)
            .set_arg(&fh)
            .set_arg(output.raw())
            .set_global_work_sizes(&[width as usize, height as usize])
            .enqueue_nd_range(session.queue())?;
    }

    #[cfg(feature = "metrics")]
    record("gray_conv_buff", t);

    output.read_to_vec(session.queue())
}

pub fn erode_gray(
    session: &Session,
    pixels: &[u8],
    width: u32,
    height: u32,
    se: &StructuringElement,
) -> Result<Vec<u8>> {
    let len = check_dims(pixels, width, height, 1)?;
    let input = DeviceBuffer::<u8, ReadOnly>::from_host(session.context(), pixels)?;
    let cells = DeviceBuffer::<i32, ReadOnly>::from_host(session.context(), se.cells())?;
    let output = DeviceBuffer::<u8, WriteOnly>::uninit(session.context(), len)?;
    let kernel = session.kernel("erode")?;
    let se_size = se.size() as u32;

    #[cfg(feature = "metrics")]
    let t = Instant::now();

    unsafe {
        ExecuteKernel::new(&kernel)
            .set_arg(input.raw())
            .set_arg(&width)
            .set_arg(&height)
            .set_arg(cells.raw())
            .set_arg(&se_size)
            .set_arg(output.raw())
            .set_global_work_sizes(&[width as usize, height as usize])
            .enqueue_nd_range(session.queue())?;
    }

    #[cfg(feature = "metrics")]
    record("erode", t);

    output.read_to_vec(session.queue())
}

// ─── Vector addition ─────────────────────────────────────────────────

/// Inputs uploaded once, so repeated runs only time dispatch and read-back.
pub struct VectorAdd {
    a: DeviceBuffer<i32, ReadOnly>,
    b: DeviceBuffer<i32, ReadOnly>,
    out: DeviceBuffer<i32, WriteOnly>,
}

impl VectorAdd {
    pub fn upload(session: &Session, a: &[i32], b: &[i32]) -> Result<Self> {
        if a.len() != b.len() {
            return Err(Error::LengthMismatch {
                host: b.len(),
                device: a.len(),
            });
        }
        Ok(Self {
            a: DeviceBuffer::from_host(session.context(), a)?,
            b: DeviceBuffer::from_host(session.context(), b)?,
            out: DeviceBuffer::uninit(session.context(), a.len())?,
        })
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Binds the buffers to `kernel` (a `simple_add`), dispatches over
    /// `len()` work items and reads the sum into `out`.
    pub fn run(&self, session: &Session, kernel: &Kernel, out: &mut [i32]) -> Result<()> {
        #[cfg(feature = "metrics")]
        let t = Instant::now();

        unsafe {
            ExecuteKernel::new(kernel)
                .set_arg(self.a.raw())
                .set_arg(self.b.raw())
                .set_arg(self.out.raw())
                .set_global_work_size(self.len())
                .enqueue_nd_range(session.queue())?;
        }

        #[cfg(feature = "metrics")]
        record("simple_add", t);

        self.out.read_into(session.queue(), out)
    }
}

/// One-shot `a + b` on the device.
pub fn vector_add(session: &Session, a: &[i32], b: &[i32]) -> Result<Vec<i32>> {
    let job = VectorAdd::upload(session, a, b)?;
    let kernel = session.kernel("simple_add")?;
    let mut out = vec![0; job.len()];
    job.run(session, &kernel, &mut out)?;
    Ok(out)
}

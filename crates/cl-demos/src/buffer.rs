use crate::{Error, Result};

use opencl3::{
    command_queue::CommandQueue,
    context::Context,
    memory::{Buffer, CL_MEM_COPY_HOST_PTR, CL_MEM_READ_ONLY, CL_MEM_WRITE_ONLY},
    types::{cl_mem_flags, CL_BLOCKING},
};
use std::{ffi::c_void, marker::PhantomData, ptr};

#[cfg(feature = "metrics")]
use crate::metrics::{record, ALLOCS, ALLOC_BYTES};
#[cfg(feature = "metrics")]
use std::{sync::atomic::Ordering, time::Instant};

// ─── Access markers ──────────────────────────────────────────────────
mod sealed {
    pub trait Sealed {}
}

/// Device-side access mode, fixed when the buffer is created.
pub trait Access: sealed::Sealed {
    const FLAGS: cl_mem_flags;
}

/// Kernel input, filled from host memory at creation.
pub struct ReadOnly;
impl sealed::Sealed for ReadOnly {}
impl Access for ReadOnly {
    const FLAGS: cl_mem_flags = CL_MEM_READ_ONLY;
}

/// Kernel output, left uninitialised until the device writes it.
pub struct WriteOnly;
impl sealed::Sealed for WriteOnly {}
impl Access for WriteOnly {
    const FLAGS: cl_mem_flags = CL_MEM_WRITE_ONLY;
}

// ─── Device buffer ───────────────────────────────────────────────────
pub struct DeviceBuffer<T, A> {
    buf: Buffer<T>,
    len: usize,
    _access: PhantomData<A>,
}

impl<T, A: Access> DeviceBuffer<T, A> {
    fn create(context: &Context, flags: cl_mem_flags, len: usize, host: *mut c_void) -> Result<Self> {
        if len == 0 {
            return Err(Error::InvalidSize(len));
        }

        #[cfg(feature = "metrics")]
        let t = Instant::now();

        let buf = unsafe { Buffer::<T>::create(context, A::FLAGS | flags, len, host)? };

        #[cfg(feature = "metrics")]
        {
            ALLOCS.fetch_add(1, Ordering::Relaxed);
            ALLOC_BYTES.fetch_add(len * std::mem::size_of::<T>(), Ordering::Relaxed);
            record("buffer_create", t);
        }

        Ok(Self {
            buf,
            len,
            _access: PhantomData,
        })
    }
}

impl<T> DeviceBuffer<T, ReadOnly> {
    /// Copies `host` into a new read-only buffer.
    pub fn from_host(context: &Context, host: &[T]) -> Result<Self> {
        Self::create(
            context,
            CL_MEM_COPY_HOST_PTR,
            host.len(),
            host.as_ptr() as *mut c_void,
        )
    }
}

impl<T> DeviceBuffer<T, WriteOnly> {
    pub fn uninit(context: &Context, len: usize) -> Result<Self> {
        Self::create(context, 0, len, ptr::null_mut())
    }

    /// Blocking read of the whole buffer. Returns once all earlier commands
    /// on `queue` and the transfer itself have completed.
    pub fn read_into(&self, queue: &CommandQueue, host: &mut [T]) -> Result<()> {
        if host.len() != self.len {
            return Err(Error::LengthMismatch {
                host: host.len(),
                device: self.len,
            });
        }

        #[cfg(feature = "metrics")]
        let t = Instant::now();

        unsafe { queue.enqueue_read_buffer(&self.buf, CL_BLOCKING, 0, host, &[])? };

        #[cfg(feature = "metrics")]
        record("enqueue_read", t);

        Ok(())
    }

    pub fn read_to_vec(&self, queue: &CommandQueue) -> Result<Vec<T>>
    where
        T: Clone + Default,
    {
        let mut host = vec![T::default(); self.len];
        self.read_into(queue, &mut host)?;
        Ok(host)
    }
}

impl<T, A> DeviceBuffer<T, A> {
    /// The underlying OpenCL buffer, for binding as a kernel argument.
    #[inline(always)]
    pub fn raw(&self) -> &Buffer<T> {
        &self.buf
    }

    /// Length in elements of `T`.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T, A> Drop for DeviceBuffer<T, A> {
    #[inline]
    fn drop(&mut self) {
        #[cfg(feature = "metrics")]
        {
            ALLOCS.fetch_sub(1, Ordering::Relaxed);
            ALLOC_BYTES.fetch_sub(self.len * std::mem::size_of::<T>(), Ordering::Relaxed);
        }
    }
}

//! Raw pixel sink
//!
//! The physical display is a fixed-size, fixed-pitch linear array of
//! packed `0xAARRGGBB` pixels handed over by the bootloader. Everything
//! that writes to it goes through [`FrameSink`], which only exposes safe
//! slices, so out-of-bounds writes cannot happen.

use core::ptr::NonNull;
use core::slice;

/// A linear pixel plane the compositor can present into.
pub trait FrameSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Row pitch in pixels (not bytes)
    fn stride(&self) -> usize {
        self.width() as usize
    }

    /// `stride * height` pixels
    fn pixels(&self) -> &[u32];
    fn pixels_mut(&mut self) -> &mut [u32];
}

/// Hardware framebuffer mapped by the bootloader.
pub struct LinearFramebuffer {
    base: NonNull<u32>,
    width: u32,
    height: u32,
    stride: usize,
}

// The mapping is owned by whoever holds the LinearFramebuffer; moving it to
// another context does not alias it.
unsafe impl Send for LinearFramebuffer {}

impl LinearFramebuffer {
    /// Wrap a bootloader-provided framebuffer.
    ///
    /// `pitch` is in bytes, as bootloaders report it.
    ///
    /// # Safety
    ///
    /// `addr` must point to at least `pitch * height` bytes of writable,
    /// 4-byte aligned memory that nothing else accesses for the lifetime
    /// of the returned value.
    pub unsafe fn new(addr: *mut u8, width: u32, height: u32, pitch: usize) -> Option<Self> {
        let base = NonNull::new(addr as *mut u32)?;
        let stride = pitch / 4;
        if stride < width as usize {
            return None;
        }
        Some(Self { base, width, height, stride })
    }

    fn len(&self) -> usize {
        self.stride * self.height as usize
    }
}

impl FrameSink for LinearFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn pixels(&self) -> &[u32] {
        // SAFETY: guaranteed by the contract of `new`
        unsafe { slice::from_raw_parts(self.base.as_ptr(), self.len()) }
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        // SAFETY: guaranteed by the contract of `new`; &mut self is unique
        unsafe { slice::from_raw_parts_mut(self.base.as_ptr(), self.len()) }
    }
}

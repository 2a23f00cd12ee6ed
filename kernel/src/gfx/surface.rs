//! Owned pixel planes
//!
//! A [`Surface`] is a `width × height` array of packed `0xAARRGGBB`
//! pixels. Window buffers and the compositor's backing store are both
//! surfaces. All accessors clip: coordinates outside the plane are
//! ignored rather than written.

use alloc::boxed::Box;
use alloc::vec::Vec;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size as EgSize},
    pixelcolor::{Rgb888, RgbColor},
    Pixel,
};

use super::blend::blend_with_alpha;
use crate::error::{QarmaError, Result};
use crate::framebuffer::FrameSink;

pub struct Surface {
    width: u32,
    height: u32,
    pixels: Box<[u32]>,
}

impl Surface {
    /// Allocate a zeroed (fully transparent) surface.
    ///
    /// Fails with [`QarmaError::AllocationFailed`] instead of aborting when
    /// the heap cannot hold the buffer.
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(QarmaError::AllocationFailed { bytes: usize::MAX })?;

        let mut pixels: Vec<u32> = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| QarmaError::AllocationFailed { bytes: len.saturating_mul(4) })?;
        pixels.resize(len, 0);

        Ok(Self { width, height, pixels: pixels.into_boxed_slice() })
    }

    /// Allocate a surface filled with `color`.
    pub fn filled(width: u32, height: u32, color: u32) -> Result<Self> {
        let mut surface = Self::try_new(width, height)?;
        surface.fill(color);
        Ok(surface)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Source-over blend `color` at (x, y) with an explicit coverage
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: f32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend_with_alpha(color, self.pixels[i], alpha);
        }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Copy `src` verbatim with its top-left corner at (x, y)
    pub fn blit(&mut self, src: &Surface, x: i32, y: i32) {
        let (w, h, stride) = (self.width, self.height, self.width as usize);
        blit_into(&mut self.pixels, w, h, stride, src, x, y);
    }

    /// Blend `src` over this surface, scaling every pixel's alpha by `opacity`
    pub fn blit_blended(&mut self, src: &Surface, x: i32, y: i32, opacity: f32) {
        let (w, h, stride) = (self.width, self.height, self.width as usize);
        blit_blend_into(&mut self.pixels, w, h, stride, src, x, y, opacity);
    }
}

/// Visible part of a `src_w × src_h` rectangle placed at (x, y) on a
/// `dst_w × dst_h` plane: `(src_x0, src_y0, dst_x0, dst_y0, w, h)`.
fn clip(dst_w: u32, dst_h: u32, src_w: u32, src_h: u32, x: i32, y: i32) -> Option<(usize, usize, usize, usize, usize, usize)> {
    let x0 = (x as i64).max(0);
    let y0 = (y as i64).max(0);
    let x1 = (x as i64 + src_w as i64).min(dst_w as i64);
    let y1 = (y as i64 + src_h as i64).min(dst_h as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((
        (x0 - x as i64) as usize,
        (y0 - y as i64) as usize,
        x0 as usize,
        y0 as usize,
        (x1 - x0) as usize,
        (y1 - y0) as usize,
    ))
}

/// Opaque copy of `src` into a strided pixel plane.
pub fn blit_into(dst: &mut [u32], dst_w: u32, dst_h: u32, stride: usize, src: &Surface, x: i32, y: i32) {
    let Some((sx, sy, dx, dy, w, h)) = clip(dst_w, dst_h, src.width, src.height, x, y) else {
        return;
    };
    let src_stride = src.width as usize;
    for row in 0..h {
        let s = (sy + row) * src_stride + sx;
        let d = (dy + row) * stride + dx;
        if let (Some(out), Some(inp)) = (dst.get_mut(d..d + w), src.pixels.get(s..s + w)) {
            out.copy_from_slice(inp);
        }
    }
}

/// Source-over blit of `src` into a strided pixel plane.
///
/// Per pixel coverage is `(pixel alpha / 255) * opacity`.
#[allow(clippy::too_many_arguments)]
pub fn blit_blend_into(
    dst: &mut [u32],
    dst_w: u32,
    dst_h: u32,
    stride: usize,
    src: &Surface,
    x: i32,
    y: i32,
    opacity: f32,
) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    let Some((sx, sy, dx, dy, w, h)) = clip(dst_w, dst_h, src.width, src.height, x, y) else {
        return;
    };
    let src_stride = src.width as usize;
    for row in 0..h {
        let s = (sy + row) * src_stride + sx;
        let d = (dy + row) * stride + dx;
        let (Some(out), Some(inp)) = (dst.get_mut(d..d + w), src.pixels.get(s..s + w)) else {
            continue;
        };
        for (o, &p) in out.iter_mut().zip(inp) {
            let a = (p >> 24) & 0xFF;
            if a == 0 {
                continue;
            }
            *o = blend_with_alpha(p, *o, a as f32 / 255.0 * opacity);
        }
    }
}

impl FrameSink for Surface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EMBEDDED-GRAPHICS TARGET
// ═══════════════════════════════════════════════════════════════════════════════

impl OriginDimensions for Surface {
    fn size(&self) -> EgSize {
        EgSize::new(self.width, self.height)
    }
}

impl DrawTarget for Surface {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let c = ((color.r() as u32) << 16) | ((color.g() as u32) << 8) | (color.b() as u32) | 0xFF000000;
            self.put(coord.x, coord.y, c);
        }
        Ok(())
    }
}

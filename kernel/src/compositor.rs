//! Window Compositor
//!
//! Two layers: a full-screen backing store (the desktop) and the private
//! buffers of the windows. A compose pass copies the backing store to the
//! framebuffer, then blends every visible window on top in registry order
//! (later windows end up in front).
//!
//! A single screen-wide dirty flag gates the whole pass. Anything that
//! changes what is on screen sets it; only a completed compose clears it.

use alloc::boxed::Box;

use log::warn;

use crate::error::{QarmaError, Result};
use crate::framebuffer::FrameSink;
use crate::gfx::surface::{blit_blend_into, blit_into};
use crate::gfx::{Color, Surface};
use crate::window::Window;

const TARGET: &str = "qarma::compositor";

/// Counters for compose passes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompositorStats {
    /// Passes that copied and blended pixels
    pub frames_composed: u64,
    /// Calls that found nothing dirty
    pub frames_skipped: u64,
    pub windows_blitted: u64,
}

pub struct Compositor {
    backing: Surface,
    framebuffer: Option<Box<dyn FrameSink + Send>>,
    dirty: bool,
    warned_headless: bool,
    stats: CompositorStats,
}

impl Compositor {
    /// Backing store of `width × height` filled with `desktop`, no
    /// framebuffer yet.
    pub fn new(width: u32, height: u32, desktop: Color) -> Result<Self> {
        let backing = Surface::filled(width, height, desktop.to_argb())?;
        Ok(Self {
            backing,
            framebuffer: None,
            dirty: true,
            warned_headless: false,
            stats: CompositorStats::default(),
        })
    }

    pub fn attach_framebuffer(&mut self, framebuffer: Box<dyn FrameSink + Send>) {
        self.framebuffer = Some(framebuffer);
        self.warned_headless = false;
        self.dirty = true;
    }

    pub fn detach_framebuffer(&mut self) -> Option<Box<dyn FrameSink + Send>> {
        self.framebuffer.take()
    }

    pub fn framebuffer(&self) -> Option<&(dyn FrameSink + Send)> {
        self.framebuffer.as_deref()
    }

    pub fn has_framebuffer(&self) -> bool {
        self.framebuffer.is_some()
    }

    /// Request a recompose before the next frame. Idempotent.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn backing(&self) -> &Surface {
        &self.backing
    }

    /// Mutable desktop plane. Handing it out marks the screen dirty.
    pub fn backing_mut(&mut self) -> &mut Surface {
        self.dirty = true;
        &mut self.backing
    }

    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    /// Recompose the screen if dirty.
    ///
    /// Each visible window renders into its own buffer and is then blended
    /// onto the framebuffer at its position with `pixel alpha × window
    /// alpha`. Returns whether any pixel work happened. Without a
    /// framebuffer this does nothing and the dirty flag stays set.
    pub fn compose<'a, I>(&mut self, windows: I) -> bool
    where
        I: IntoIterator<Item = &'a mut Window>,
    {
        if !self.dirty {
            self.stats.frames_skipped += 1;
            return false;
        }
        if !self.begin_frame() {
            return false;
        }

        for window in windows {
            if !window.is_visible() {
                continue;
            }
            window.render();
            self.blend_window(window);
        }

        self.finish_frame();
        true
    }

    /// Blit step only: backing store plus the current contents of every
    /// visible window, without asking windows to render. Ignores the
    /// dirty flag and clears it.
    pub fn present<'a, I>(&mut self, windows: I) -> bool
    where
        I: IntoIterator<Item = &'a Window>,
    {
        if !self.begin_frame() {
            return false;
        }
        for window in windows {
            if window.is_visible() {
                self.blend_window(window);
            }
        }
        self.finish_frame();
        true
    }

    /// Copy the backing store to the framebuffer. `false` when headless.
    fn begin_frame(&mut self) -> bool {
        let Some(fb) = self.framebuffer.as_mut() else {
            if !self.warned_headless {
                warn!(target: TARGET, "{}, rendering disabled", QarmaError::NoFramebuffer);
                self.warned_headless = true;
            }
            return false;
        };

        let (w, h, stride) = (fb.width(), fb.height(), fb.stride());
        let pixels = fb.pixels_mut();
        // the desktop may be smaller than the display
        if self.backing.width() < w || self.backing.height() < h {
            pixels.fill(0xFF00_0000);
        }
        blit_into(pixels, w, h, stride, &self.backing, 0, 0);
        true
    }

    fn blend_window(&mut self, window: &Window) {
        let Some(fb) = self.framebuffer.as_mut() else {
            return;
        };
        let core = window.core();
        let (w, h, stride) = (fb.width(), fb.height(), fb.stride());
        blit_blend_into(fb.pixels_mut(), w, h, stride, core.surface(), core.x, core.y, core.alpha);
        self.stats.windows_blitted += 1;

        #[cfg(feature = "compose-trace")]
        log::trace!(target: TARGET, "blended {} at ({}, {})", window.id(), core.x, core.y);
    }

    fn finish_frame(&mut self) {
        self.dirty = false;
        self.stats.frames_composed += 1;
    }
}

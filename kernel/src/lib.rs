//! QARMA Kernel Desktop Core
//!
//! Cooperative tick scheduler and window compositor for a freestanding
//! kernel. One tick advances time, runs every registered module and
//! running process, updates every window and recomposes the screen when
//! something marked it dirty.
//!
//! Hardware (timer, framebuffer, keyboard), the heap and the boot log are
//! external collaborators reached through narrow traits:
//! [`time::TickSource`], [`framebuffer::FrameSink`], [`gfx::GlyphSource`]
//! and the [`logger`] sink.
//!
//! Host builds (`cfg(test)`) link `std` so the test suite runs natively.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod logger;
pub mod time;
pub mod input;
pub mod gfx;
pub mod framebuffer;
pub mod compositor;
pub mod window;
pub mod wm;
pub mod scheduler;
pub mod session;

pub use config::QarmaConfig;
pub use error::{QarmaError, Result};
pub use session::Qarma;

//! Clock overlay
//!
//! Counts whole seconds from the scheduler's frame counter (not the wall
//! clock) and draws them as `HH:MM:SS` in a small shadowed box.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use super::behavior::{UpdateOutcome, WindowBehavior};
use super::WindowCore;
use crate::gfx::{draw, Color, Font8x8};
use crate::scheduler::TickContext;

const SHADOW_OFFSET: u32 = 2;
const SHADOW: u32 = 0x6000_0000;
const TEXT_X: i32 = 10;
const TEXT_Y: i32 = 6;

pub struct ClockState {
    elapsed_seconds: u64,
    last_tick: Option<u64>,
    /// Frames per second
    threshold: u64,
    pub foreground: Color,
    pub border: Color,
}

impl ClockState {
    pub fn new(tick_rate: u32, foreground: Color, border: Color) -> Self {
        Self {
            elapsed_seconds: 0,
            last_tick: None,
            threshold: tick_rate.max(1) as u64,
            foreground,
            border,
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn reset(&mut self) {
        self.elapsed_seconds = 0;
        self.last_tick = None;
    }
}

/// `HH:MM:SS`. Hours past 99 wrap in the two-digit field.
pub fn format_time(seconds: u64) -> [u8; 8] {
    let hrs = (seconds / 3600) % 100;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    let digit = |v: u64| b'0' + v as u8;
    [
        digit(hrs / 10),
        digit(hrs % 10),
        b':',
        digit(mins / 10),
        digit(mins % 10),
        b':',
        digit(secs / 10),
        digit(secs % 10),
    ]
}

impl WindowBehavior for ClockState {
    fn update(&mut self, core: &mut WindowCore, ctx: &TickContext) -> UpdateOutcome {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(ctx.tick_count);
            core.dirty = true;
            return UpdateOutcome::Continue;
        };

        let elapsed = ctx.tick_count.saturating_sub(last);
        if elapsed >= self.threshold {
            let whole = elapsed / self.threshold;
            self.elapsed_seconds += whole;
            // carry the partial second over
            self.last_tick = Some(last + whole * self.threshold);
            core.dirty = true;
        }
        UpdateOutcome::Continue
    }

    fn render(&mut self, core: &mut WindowCore) {
        let background = core.background.to_argb();
        let (w, h) = (core.width(), core.height());
        let box_w = w.saturating_sub(SHADOW_OFFSET);
        let box_h = h.saturating_sub(SHADOW_OFFSET);
        let surface = core.surface_mut();

        surface.fill(0);
        draw::fill_rect(surface, SHADOW_OFFSET as i32, SHADOW_OFFSET as i32, box_w, box_h, SHADOW);
        draw::fill_rect(surface, 0, 0, box_w, box_h, background);

        let _ = Rectangle::new(Point::zero(), Size::new(box_w, box_h))
            .into_styled(PrimitiveStyle::with_stroke(self.border.to_rgb888(), 1))
            .draw(surface);

        let text = format_time(self.elapsed_seconds);
        if let Ok(text) = core::str::from_utf8(&text) {
            draw::draw_text(surface, &Font8x8, TEXT_X, TEXT_Y, text, self.foreground.to_argb());
        }
    }
}

//! Time utilities
//!
//! The timer interrupt bumps a monotonic tick counter; [`TickClock`] turns
//! that counter into the per-tick [`TickContext`] handed to every update.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::scheduler::TickContext;

/// Monotonic hardware tick counter at a fixed frequency.
pub trait TickSource {
    fn ticks(&self) -> u64;
    fn frequency_hz(&self) -> u32;

    fn uptime_ms(&self) -> u64 {
        let hz = self.frequency_hz().max(1) as u128;
        (self.ticks() as u128 * 1000 / hz) as u64
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn ticks(&self) -> u64 {
        (**self).ticks()
    }

    fn frequency_hz(&self) -> u32 {
        (**self).frequency_hz()
    }
}

impl<T: TickSource + ?Sized> TickSource for Arc<T> {
    fn ticks(&self) -> u64 {
        (**self).ticks()
    }

    fn frequency_hz(&self) -> u32 {
        (**self).frequency_hz()
    }
}

/// Counter incremented from the timer interrupt.
pub struct TickCounter {
    ticks: AtomicU64,
    hz: u32,
}

impl TickCounter {
    pub const fn new(hz: u32) -> Self {
        Self { ticks: AtomicU64::new(0), hz }
    }

    /// One timer interrupt
    #[inline]
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn advance(&self, ticks: u64) {
        self.ticks.fetch_add(ticks, Ordering::Relaxed);
    }
}

impl TickSource for TickCounter {
    fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    fn frequency_hz(&self) -> u32 {
        self.hz
    }
}

/// System tick counter, programmed for 1 kHz
pub static SYSTEM_TICKS: TickCounter = TickCounter::new(1000);

/// Called by the timer interrupt handler
pub fn on_timer_interrupt() {
    SYSTEM_TICKS.tick();
}

/// Samples a [`TickSource`] once per scheduler tick.
///
/// `tick_count` is the number of whole frames at `tick_rate` Hz since
/// boot, derived from milliseconds. `delta_time` is measured from the
/// previous sample, or from construction for the first one.
pub struct TickClock<S> {
    source: S,
    tick_rate: u32,
    last_ms: u64,
}

impl<S: TickSource> TickClock<S> {
    pub fn new(source: S, tick_rate: u32) -> Self {
        let last_ms = source.uptime_ms();
        Self { source, tick_rate: tick_rate.max(1), last_ms }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn now_ms(&self) -> u64 {
        self.source.uptime_ms()
    }

    pub fn sample(&mut self) -> TickContext {
        let now = self.now_ms();
        let delta_ms = now.saturating_sub(self.last_ms);
        self.last_ms = now;

        TickContext {
            tick_count: frames_at(now, self.tick_rate),
            delta_time: delta_ms as f32 / 1000.0,
            uptime_seconds: now as f32 / 1000.0,
        }
    }
}

/// Whole frames at `rate` Hz contained in `ms` milliseconds
pub fn frames_at(ms: u64, rate: u32) -> u64 {
    (ms as u128 * rate as u128 / 1000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_converts_to_ms() {
        let pit = TickCounter::new(100);
        pit.advance(250);
        assert_eq!(pit.uptime_ms(), 2500);
    }

    #[test]
    fn first_sample_is_relative_to_construction() {
        let pit = Arc::new(TickCounter::new(1000));
        pit.advance(5000);
        let mut clock = TickClock::new(pit.clone(), 60);

        pit.advance(100);
        let ctx = clock.sample();
        assert!((ctx.delta_time - 0.1).abs() < 1e-6);
        assert!((ctx.uptime_seconds - 5.1).abs() < 1e-4);
        assert_eq!(ctx.tick_count, 306);
    }

    #[test]
    fn idle_sample_has_zero_delta() {
        let pit = TickCounter::new(1000);
        let mut clock = TickClock::new(&pit, 60);
        let ctx = clock.sample();
        assert_eq!(ctx.delta_time, 0.0);
        assert_eq!(ctx.tick_count, 0);
    }

    #[test]
    fn frame_count_does_not_truncate_divisor() {
        // 1000 / 60 would round to 16 ms frames and overcount.
        assert_eq!(frames_at(1000, 60), 60);
        assert_eq!(frames_at(999, 60), 59);
    }
}

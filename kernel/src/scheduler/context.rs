//! Per-tick context

/// Built fresh by every scheduler tick and lent to each update call of
/// that tick. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickContext {
    /// Whole scheduler frames since boot
    pub tick_count: u64,
    /// Seconds since the previous tick
    pub delta_time: f32,
    pub uptime_seconds: f32,
}

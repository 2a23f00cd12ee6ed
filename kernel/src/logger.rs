//! Kernel logging subsystem
//!
//! Backs the `log` facade with a sink supplied by the kernel (serial port,
//! boot log buffer, ...). Lines carry the uptime in milliseconds and the
//! level, matching the format of the kernel's serial console.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicU64, Ordering};

use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::error::{QarmaError, Result};

/// Receives one fully formatted line (newline included).
pub type LogSink = fn(fmt::Arguments);

/// Uptime stamp for log lines, refreshed by the scheduler every tick
static UPTIME_MS: AtomicU64 = AtomicU64::new(0);

static LOGGER: KernelLogger = KernelLogger::new();

pub struct KernelLogger {
    sink: Mutex<Option<LogSink>>,
}

impl KernelLogger {
    const fn new() -> Self {
        Self { sink: Mutex::new(None) }
    }
}

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let sink = *self.sink.lock();
        if let Some(sink) = sink {
            sink(format_args!(
                "[{:>10}][{:<5}] {}: {}\n",
                uptime_ms(),
                record.level().as_str(),
                record.target(),
                record.args()
            ));
        }
    }

    fn flush(&self) {}
}

/// Install the kernel logger. Only the first call succeeds; a later one
/// leaves the running sink and level alone.
pub fn init(sink: LogSink, level: LevelFilter) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|_| QarmaError::LoggerInstalled)?;
    *LOGGER.sink.lock() = Some(sink);
    log::set_max_level(level);
    Ok(())
}

/// Swap the output sink without reinstalling the logger.
pub fn set_sink(sink: Option<LogSink>) {
    *LOGGER.sink.lock() = sink;
}

pub fn stamp(now_ms: u64) {
    UPTIME_MS.store(now_ms, Ordering::Relaxed);
}

pub fn uptime_ms() -> u64 {
    UPTIME_MS.load(Ordering::Relaxed)
}

/// Format a line exactly as the installed logger would.
pub fn write_line<W: Write>(
    out: &mut W,
    timestamp: u64,
    level: log::Level,
    target: &str,
    args: fmt::Arguments,
) -> fmt::Result {
    writeln!(out, "[{:>10}][{:<5}] {}: {}", timestamp, level.as_str(), target, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn quiet(_: fmt::Arguments) {}

    fn loud(args: fmt::Arguments) {
        let _ = alloc::format!("{}", args);
    }

    fn current_sink() -> Option<usize> {
        LOGGER.sink.lock().map(|f| f as usize)
    }

    #[test]
    fn line_layout() {
        let mut out = String::new();
        write_line(&mut out, 1234, log::Level::Warn, "qarma::wm", format_args!("full")).unwrap();
        assert_eq!(out, "[      1234][WARN ] qarma::wm: full\n");
    }

    #[test]
    fn second_init_keeps_running_sink() {
        let _ = init(quiet, LevelFilter::Trace);
        set_sink(Some(quiet));

        assert_eq!(init(loud, LevelFilter::Trace), Err(QarmaError::LoggerInstalled));
        assert_eq!(current_sink(), Some(quiet as usize));
    }
}

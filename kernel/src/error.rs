//! Error types shared by the scheduler, window manager and compositor.
//!
//! Everything here is recoverable. The only fatal condition of the core
//! (an unknown window archetype reaching the factory) panics instead.

use thiserror::Error;

use crate::scheduler::Pid;
use crate::window::WindowId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QarmaError {
    #[error("window registry full ({capacity} slots)")]
    RegistryFull { capacity: usize },

    #[error("module table full ({capacity} slots)")]
    ModuleTableFull { capacity: usize },

    #[error("process table full ({capacity} slots)")]
    ProcessTableFull { capacity: usize },

    #[error("window {0} not registered")]
    WindowNotFound(WindowId),

    #[error("no process with pid {0}")]
    ProcessNotFound(Pid),

    #[error("allocation of {bytes} bytes failed")]
    AllocationFailed { bytes: usize },

    #[error("window id space exhausted")]
    IdSpaceExhausted,

    #[error("no framebuffer attached")]
    NoFramebuffer,

    #[error("unknown window archetype {0}")]
    UnknownArchetype(u32),

    #[error("kernel logger already installed")]
    LoggerInstalled,
}

pub type Result<T> = core::result::Result<T, QarmaError>;

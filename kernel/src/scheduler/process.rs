//! Cooperative processes
//!
//! Processes are run-to-completion callbacks invoked once per tick while
//! `Running`. They are never removed: stopping only changes the state and
//! the slot stays taken, so a pid is stable for the life of the system.

use alloc::boxed::Box;
use core::fmt;

use super::context::TickContext;

/// Process identifier: the slot index at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub usize);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Called every tick
    Running,
    /// Skipped until resumed by its owner
    Waiting,
    /// Skipped forever
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    Low = 0,
    Normal = 1,
    High = 2,
    RealTime = 3,
}

/// Handed to a process on each run so it can inspect and change its own state.
#[derive(Debug)]
pub struct ProcessControl {
    pid: Pid,
    state: ProcessState,
}

impl ProcessControl {
    pub(super) fn new(pid: Pid, state: ProcessState) -> Self {
        Self { pid, state }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Park until the owner resumes this process
    pub fn wait(&mut self) {
        self.state = ProcessState::Waiting;
    }

    pub fn stop(&mut self) {
        self.state = ProcessState::Stopped;
    }
}

/// Entry point of a process. Any state it needs lives in the implementor.
pub trait ProcessMain {
    fn run(&mut self, ctx: &TickContext, control: &mut ProcessControl);
}

impl<F> ProcessMain for F
where
    F: FnMut(&TickContext, &mut ProcessControl),
{
    fn run(&mut self, ctx: &TickContext, control: &mut ProcessControl) {
        self(ctx, control)
    }
}

pub struct Process {
    pub pid: Pid,
    pub state: ProcessState,
    pub priority: Priority,
    pub(super) main: Box<dyn ProcessMain + Send>,
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("state", &self.state)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

//! Scheduler Subsystem
//!
//! Single-threaded cooperative tick loop. Each [`Scheduler::tick`] samples
//! the clock, then calls every module's `update` and every running
//! process's entry point in registration order. Nothing preempts: a
//! callback that has to wait keeps its own state and polls next tick.

mod context;
mod event;
mod module;
mod process;

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{debug, info, warn};

pub use context::TickContext;
pub use event::{Event, EventKind, EventPayload, EVENT_INPUT, EVENT_MEMORY, EVENT_RENDER, EVENT_SHUTDOWN};
pub use module::{Module, ModuleCaps};
pub use process::{Pid, Priority, Process, ProcessControl, ProcessMain, ProcessState};

use crate::config::SchedulerConfig;
use crate::error::{QarmaError, Result};
use crate::logger;
use crate::time::{TickClock, TickSource};

const TARGET: &str = "qarma::sched";

struct ModuleSlot {
    name: Cow<'static, str>,
    module: Box<dyn Module + Send>,
}

pub struct Scheduler<S> {
    clock: TickClock<S>,
    running: bool,
    modules: Vec<ModuleSlot>,
    processes: Vec<Process>,
    max_modules: usize,
    max_processes: usize,
}

impl<S: TickSource> Scheduler<S> {
    pub fn new(source: S, config: &SchedulerConfig) -> Self {
        info!(target: TARGET, "scheduler ready at {} Hz", config.tick_rate);
        Self {
            clock: TickClock::new(source, config.tick_rate),
            running: true,
            modules: Vec::with_capacity(config.max_modules),
            processes: Vec::with_capacity(config.max_processes),
            max_modules: config.max_modules,
            max_processes: config.max_processes,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn clock(&self) -> &TickClock<S> {
        &self.clock
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Registered module names in registration order
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|slot| slot.name.as_ref())
    }

    /// Append a module. Fails when the module table is full.
    pub fn register_module(&mut self, name: impl Into<Cow<'static, str>>, module: Box<dyn Module + Send>) -> Result<()> {
        let name = name.into();
        if self.modules.len() >= self.max_modules {
            warn!(target: TARGET, "module table full ({}), dropping '{}'", self.max_modules, name);
            return Err(QarmaError::ModuleTableFull { capacity: self.max_modules });
        }
        info!(target: TARGET, "registered module '{}'", name);
        self.modules.push(ModuleSlot { name, module });
        Ok(())
    }

    /// Append a running process; its pid is its slot index.
    pub fn create_process<P>(&mut self, priority: Priority, main: P) -> Result<Pid>
    where
        P: ProcessMain + Send + 'static,
    {
        if self.processes.len() >= self.max_processes {
            warn!(target: TARGET, "process table full ({})", self.max_processes);
            return Err(QarmaError::ProcessTableFull { capacity: self.max_processes });
        }
        let pid = Pid(self.processes.len());
        self.processes.push(Process { pid, state: ProcessState::Running, priority, main: Box::new(main) });
        debug!(target: TARGET, "created process {} ({:?})", pid, priority);
        Ok(pid)
    }

    /// Mark a process stopped. Its slot is never reclaimed.
    pub fn stop_process(&mut self, pid: Pid) -> Result<()> {
        self.set_process_state(pid, ProcessState::Stopped)
    }

    pub fn set_process_state(&mut self, pid: Pid, state: ProcessState) -> Result<()> {
        match self.processes.get_mut(pid.0) {
            Some(process) => {
                debug!(target: TARGET, "process {}: {:?} -> {:?}", pid, process.state, state);
                process.state = state;
                Ok(())
            }
            None => {
                warn!(target: TARGET, "no process with pid {}", pid);
                Err(QarmaError::ProcessNotFound(pid))
            }
        }
    }

    pub fn process_state(&self, pid: Pid) -> Option<ProcessState> {
        self.processes.get(pid.0).map(|p| p.state)
    }

    /// Run one scheduler frame.
    ///
    /// Returns the context handed to this frame's callbacks, or `None`
    /// once the scheduler has been shut down.
    pub fn tick(&mut self) -> Option<TickContext> {
        if !self.running {
            return None;
        }

        let ctx = self.clock.sample();
        logger::stamp(self.clock.now_ms());

        for slot in self.modules.iter_mut() {
            if slot.module.capabilities().contains(ModuleCaps::UPDATE) {
                slot.module.update(&ctx);
            }
        }

        for process in self.processes.iter_mut() {
            if process.state != ProcessState::Running {
                continue;
            }
            let mut control = ProcessControl::new(process.pid, process.state);
            process.main.run(&ctx, &mut control);
            if control.state() != process.state {
                debug!(target: TARGET, "process {} now {:?}", process.pid, control.state());
                process.state = control.state();
            }
        }

        Some(ctx)
    }

    /// Deliver `event` to every module with an event handler, or only to
    /// the one registered under `event.target`. Returns how many modules
    /// received it.
    pub fn dispatch_event(&mut self, event: &Event) -> usize {
        let mut delivered = 0;
        for slot in self.modules.iter_mut() {
            if !slot.module.capabilities().contains(ModuleCaps::EVENTS) || !event.is_for(&slot.name) {
                continue;
            }
            slot.module.handle_event(event);
            delivered += 1;
        }
        if delivered == 0 {
            if let Some(target) = &event.target {
                debug!(target: TARGET, "event {:#04x} for '{}' reached nobody", event.kind.code(), target);
            }
        }
        delivered
    }

    /// Two-phase teardown: every module's `shutdown` in registration
    /// order, then a broadcast `Shutdown` event. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        info!(target: TARGET, "shutting down {} modules", self.modules.len());

        for slot in self.modules.iter_mut() {
            if slot.module.capabilities().contains(ModuleCaps::SHUTDOWN) {
                slot.module.shutdown();
            }
        }

        self.dispatch_event(&Event::shutdown());
    }
}

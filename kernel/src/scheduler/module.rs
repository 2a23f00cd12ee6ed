//! Scheduler modules
//!
//! A module is a named subsystem ticked once per scheduler frame. Each
//! callback is optional: a module advertises the ones it wants through
//! [`Module::capabilities`] and the scheduler skips the rest.

use bitflags::bitflags;

use super::context::TickContext;
use super::event::Event;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModuleCaps: u8 {
        const UPDATE   = 1 << 0;
        const SHUTDOWN = 1 << 1;
        const EVENTS   = 1 << 2;
    }
}

pub trait Module {
    fn capabilities(&self) -> ModuleCaps {
        ModuleCaps::all()
    }

    fn update(&mut self, _ctx: &TickContext) {}

    fn shutdown(&mut self) {}

    fn handle_event(&mut self, _event: &Event) {}
}

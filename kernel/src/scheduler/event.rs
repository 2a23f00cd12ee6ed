//! Scheduler events
//!
//! Events are delivered synchronously by [`Scheduler::dispatch_event`]
//! either to every module or to the single module registered under the
//! target name.
//!
//! [`Scheduler::dispatch_event`]: super::Scheduler::dispatch_event

use alloc::borrow::Cow;

pub const EVENT_INPUT: u32 = 0x01;
pub const EVENT_RENDER: u32 = 0x02;
pub const EVENT_MEMORY: u32 = 0x03;
pub const EVENT_SHUTDOWN: u32 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Input,
    Render,
    Memory,
    Shutdown,
    /// Application defined
    Other(u32),
}

impl EventKind {
    pub const fn code(self) -> u32 {
        match self {
            EventKind::Input => EVENT_INPUT,
            EventKind::Render => EVENT_RENDER,
            EventKind::Memory => EVENT_MEMORY,
            EventKind::Shutdown => EVENT_SHUTDOWN,
            EventKind::Other(code) => code,
        }
    }

    pub const fn from_code(code: u32) -> Self {
        match code {
            EVENT_INPUT => EventKind::Input,
            EVENT_RENDER => EventKind::Render,
            EVENT_MEMORY => EventKind::Memory,
            EVENT_SHUTDOWN => EventKind::Shutdown,
            other => EventKind::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPayload {
    #[default]
    None,
    /// Raw keycode
    Key(u8),
    Value(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub payload: EventPayload,
    /// Name of the sender
    pub origin: Cow<'static, str>,
    /// `None` broadcasts to every module
    pub target: Option<Cow<'static, str>>,
}

impl Event {
    pub fn broadcast(kind: EventKind, origin: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, payload: EventPayload::None, origin: origin.into(), target: None }
    }

    /// Restrict delivery to the module registered as `target`
    pub fn to(mut self, target: impl Into<Cow<'static, str>>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn shutdown() -> Self {
        Self::broadcast(EventKind::Shutdown, "scheduler")
    }

    pub fn key(keycode: u8) -> Self {
        Self::broadcast(EventKind::Input, "input").with_payload(EventPayload::Key(keycode))
    }

    /// Whether a module registered as `name` should receive this event.
    /// Names compare exactly, case included.
    pub fn is_for(&self, name: &str) -> bool {
        match &self.target {
            None => true,
            Some(target) => target.as_ref() == name,
        }
    }
}

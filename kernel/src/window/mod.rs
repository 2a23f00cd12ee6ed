//! Window objects
//!
//! A [`Window`] is the common state every window carries ([`WindowCore`]:
//! identity, geometry, flags, its private pixel buffer) plus a
//! [`Behavior`] selected by its archetype. The window manager only ever
//! talks to the [`WindowBehavior`] interface; archetype state lives inside
//! the behavior variant and is dropped with it.

mod behavior;
mod clock;
mod debug;
mod factory;
mod panel;
mod splash;

use alloc::string::String;
use core::fmt;

use bitflags::bitflags;
use log::debug;

pub use behavior::{Behavior, GenericFill, UpdateOutcome, WindowBehavior};
pub use clock::{format_time, ClockState};
pub use debug::{ConsoleLine, DebugConsole, CONSOLE_LINES, CONSOLE_LINE_LEN};
pub use factory::{WindowFactory, WindowGeometry};
pub use panel::PanelState;
pub use splash::SplashState;

use crate::error::QarmaError;
use crate::gfx::{Color, Surface};
use crate::scheduler::TickContext;

const TARGET: &str = "qarma::window";

/// Window identifier. Handed out in increasing order, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u32);

impl WindowId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Window archetype. The discriminants are the archetype ids accepted by
/// [`WindowFactory::create_archetype`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WindowKind {
    Generic = 0,
    Splash = 1,
    Modal = 2,
    Debug = 3,
    Custom = 4,
    ClockOverlay = 5,
    Dialog = 6,
}

impl TryFrom<u32> for WindowKind {
    type Error = QarmaError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Ok(match raw {
            0 => WindowKind::Generic,
            1 => WindowKind::Splash,
            2 => WindowKind::Modal,
            3 => WindowKind::Debug,
            4 => WindowKind::Custom,
            5 => WindowKind::ClockOverlay,
            6 => WindowKind::Dialog,
            other => return Err(QarmaError::UnknownArchetype(other)),
        })
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        const VISIBLE     = 1 << 0;
        const FADE_OUT    = 1 << 1;
        const TOPMOST     = 1 << 2;
        const INTERACTIVE = 1 << 3;
        const MODAL       = 1 << 4;
    }
}

/// State shared by every archetype.
pub struct WindowCore {
    id: WindowId,
    kind: WindowKind,
    pub title: String,
    pub flags: WindowFlags,
    pub x: i32,
    pub y: i32,
    pub background: Color,
    /// Whole-window opacity in [0, 1], applied on top of per-pixel alpha
    pub alpha: f32,
    /// Set by the window when it needs recompositing
    pub dirty: bool,
    /// Non-owning tag of whoever created the window
    pub owner: Option<&'static str>,
    surface: Surface,
}

impl WindowCore {
    pub(crate) fn new(id: WindowId, kind: WindowKind, title: String, flags: WindowFlags, x: i32, y: i32, surface: Surface) -> Self {
        Self {
            id,
            kind,
            title,
            flags,
            x,
            y,
            background: Color::BLACK,
            alpha: 1.0,
            dirty: true,
            owner: None,
            surface,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Fixed at creation
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(WindowFlags::VISIBLE)
    }

    /// Private pixel buffer, always `width × height`
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

pub struct Window {
    core: WindowCore,
    behavior: Behavior,
}

impl Window {
    pub(crate) fn new(core: WindowCore, behavior: Behavior) -> Self {
        Self { core, behavior }
    }

    pub fn id(&self) -> WindowId {
        self.core.id
    }

    pub fn kind(&self) -> WindowKind {
        self.core.kind
    }

    pub fn title(&self) -> &str {
        &self.core.title
    }

    pub fn core(&self) -> &WindowCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut WindowCore {
        &mut self.core
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut Behavior {
        &mut self.behavior
    }

    pub fn is_visible(&self) -> bool {
        self.core.is_visible()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.core.flags.set(WindowFlags::VISIBLE, visible);
        self.core.dirty = true;
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.core.x = x;
        self.core.y = y;
        self.core.dirty = true;
    }

    /// The debug console, for debug windows
    pub fn console_mut(&mut self) -> Option<&mut DebugConsole> {
        match &mut self.behavior {
            Behavior::Debug(console) => Some(console),
            _ => None,
        }
    }

    pub fn update(&mut self, ctx: &TickContext) -> UpdateOutcome {
        self.behavior.update(&mut self.core, ctx)
    }

    pub fn render(&mut self) {
        self.behavior.render(&mut self.core);
    }

    pub fn on_char(&mut self, ch: char) {
        self.behavior.on_char(&mut self.core, ch);
    }

    /// Read and clear the window's own dirty flag
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.core.dirty)
    }

    /// Run the archetype's teardown and free the window.
    ///
    /// Takes the window by value, so a window can only be destroyed once.
    pub fn destroy(mut self) {
        debug!(target: TARGET, "destroying window {} '{}'", self.core.id, self.core.title);
        self.behavior.destroy(&mut self.core);
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.core.id)
            .field("kind", &self.core.kind)
            .field("title", &self.core.title)
            .field("flags", &self.core.flags)
            .field("pos", &(self.core.x, self.core.y))
            .field("size", &(self.core.width(), self.core.height()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archetype_ids_are_stable() {
        assert_eq!(WindowKind::try_from(1), Ok(WindowKind::Splash));
        assert_eq!(WindowKind::try_from(5), Ok(WindowKind::ClockOverlay));
        assert_eq!(WindowKind::try_from(6), Ok(WindowKind::Dialog));
        assert_eq!(WindowKind::try_from(7), Err(QarmaError::UnknownArchetype(7)));
        assert_eq!(WindowKind::Debug as u32, 3);
    }

    #[test]
    fn flag_bits() {
        assert_eq!(WindowFlags::VISIBLE.bits(), 1);
        assert_eq!(WindowFlags::FADE_OUT.bits(), 2);
        assert_eq!(WindowFlags::TOPMOST.bits(), 4);
        assert_eq!(WindowFlags::INTERACTIVE.bits(), 8);
    }

    #[test]
    fn dirty_is_consumed_once() {
        let surface = Surface::try_new(2, 2).unwrap();
        let core = WindowCore::new(WindowId::new(1), WindowKind::Generic, "w".into(), WindowFlags::VISIBLE, 0, 0, surface);
        let mut w = Window::new(core, Behavior::Generic(GenericFill));
        assert!(w.take_dirty());
        assert!(!w.take_dirty());
        w.move_to(3, 4);
        assert!(w.take_dirty());
    }
}

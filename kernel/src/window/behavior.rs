//! Per-archetype window behavior

use alloc::boxed::Box;

use super::clock::ClockState;
use super::debug::DebugConsole;
use super::panel::PanelState;
use super::splash::SplashState;
use super::WindowCore;
use crate::scheduler::TickContext;

/// What the window wants after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Continue,
    /// Remove and destroy this window once the current pass finishes
    Destroy,
}

/// Callbacks a window archetype may provide. Every method defaults to a
/// no-op.
pub trait WindowBehavior {
    fn update(&mut self, _core: &mut WindowCore, _ctx: &TickContext) -> UpdateOutcome {
        UpdateOutcome::Continue
    }

    /// Paint into `core`'s private buffer
    fn render(&mut self, _core: &mut WindowCore) {}

    /// Release archetype resources. Called exactly once.
    fn destroy(&mut self, _core: &mut WindowCore) {}

    /// A printable character was typed while the window is interactive
    fn on_char(&mut self, _core: &mut WindowCore, _ch: char) {}
}

/// Plain window: fills its buffer with its background color.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericFill;

impl WindowBehavior for GenericFill {
    fn render(&mut self, core: &mut WindowCore) {
        let bg = core.background.to_argb();
        core.surface_mut().fill(bg);
    }
}

pub enum Behavior {
    Generic(GenericFill),
    Splash(SplashState),
    ClockOverlay(ClockState),
    Modal(PanelState),
    Dialog(PanelState),
    Debug(DebugConsole),
    Custom(Box<dyn WindowBehavior + Send>),
}

impl Behavior {
    fn inner(&mut self) -> &mut dyn WindowBehavior {
        match self {
            Behavior::Generic(b) => b,
            Behavior::Splash(b) => b,
            Behavior::ClockOverlay(b) => b,
            Behavior::Modal(b) | Behavior::Dialog(b) => b,
            Behavior::Debug(b) => b,
            Behavior::Custom(b) => b.as_mut(),
        }
    }
}

impl WindowBehavior for Behavior {
    fn update(&mut self, core: &mut WindowCore, ctx: &TickContext) -> UpdateOutcome {
        self.inner().update(core, ctx)
    }

    fn render(&mut self, core: &mut WindowCore) {
        self.inner().render(core)
    }

    fn destroy(&mut self, core: &mut WindowCore) {
        self.inner().destroy(core)
    }

    fn on_char(&mut self, core: &mut WindowCore, ch: char) {
        self.inner().on_char(core, ch)
    }
}

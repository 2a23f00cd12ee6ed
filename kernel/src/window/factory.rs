//! Window factory
//!
//! Builds fully initialised windows. A window either comes back complete
//! (buffer allocated, behavior attached, fresh id) or not at all. The
//! factory does not register what it builds.

use alloc::boxed::Box;
use alloc::string::String;

use log::{info, warn};

use super::behavior::{Behavior, GenericFill, WindowBehavior};
use super::clock::ClockState;
use super::debug::DebugConsole;
use super::panel::PanelState;
use super::splash::SplashState;
use super::{Window, WindowCore, WindowFlags, WindowId, WindowKind, TARGET};
use crate::config::{ClockConfig, QarmaConfig, SplashConfig, WindowConfig};
use crate::error::{QarmaError, Result};
use crate::gfx::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

pub struct WindowFactory {
    next_id: u32,
    windows: WindowConfig,
    splash: SplashConfig,
    clock: ClockConfig,
    tick_rate: u32,
}

impl WindowFactory {
    pub fn new(config: &QarmaConfig) -> Self {
        Self {
            next_id: 1,
            windows: config.windows.clone(),
            splash: config.splash.clone(),
            clock: config.clock.clone(),
            tick_rate: config.scheduler.tick_rate,
        }
    }

    fn generate_id(&mut self) -> Result<WindowId> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(QarmaError::IdSpaceExhausted)?;
        Ok(WindowId::new(id))
    }

    fn default_geometry(&self) -> WindowGeometry {
        WindowGeometry::new(self.windows.default_x, self.windows.default_y, self.windows.default_width, self.windows.default_height)
    }

    fn build(
        &mut self,
        kind: WindowKind,
        title: &str,
        geometry: WindowGeometry,
        flags: WindowFlags,
        behavior: Behavior,
    ) -> Result<Window> {
        // buffer first, so a failed allocation does not burn an id
        let surface = Surface::try_new(geometry.width, geometry.height).map_err(|e| {
            warn!(target: TARGET, "no memory for {}x{} '{}'", geometry.width, geometry.height, title);
            e
        })?;
        let id = self.generate_id()?;

        let core = WindowCore::new(id, kind, String::from(title), flags, geometry.x, geometry.y, surface);
        info!(target: TARGET, "created {:?} window {} '{}'", kind, id, title);
        Ok(Window::new(core, behavior))
    }

    /// Create a window of `kind` at the default placement.
    pub fn create(&mut self, kind: WindowKind, title: &str, flags: WindowFlags) -> Result<Window> {
        match kind {
            WindowKind::Splash => self.splash(title, flags),
            WindowKind::ClockOverlay => self.clock_overlay(title, flags),
            _ => {
                let geometry = self.default_geometry();
                self.create_at(kind, title, geometry, flags)
            }
        }
    }

    /// Create a window of `kind` with explicit geometry.
    pub fn create_at(&mut self, kind: WindowKind, title: &str, geometry: WindowGeometry, flags: WindowFlags) -> Result<Window> {
        let (behavior, flags) = match kind {
            WindowKind::Generic | WindowKind::Custom => (Behavior::Generic(GenericFill), flags),
            WindowKind::Modal => (Behavior::Modal(PanelState::default()), flags | WindowFlags::MODAL),
            WindowKind::Dialog => (Behavior::Dialog(PanelState::default()), flags),
            WindowKind::Debug => (Behavior::Debug(DebugConsole::new()), flags),
            WindowKind::Splash => (
                Behavior::Splash(SplashState::new(self.splash.fade_speed, self.splash.fallback)),
                flags | WindowFlags::FADE_OUT,
            ),
            WindowKind::ClockOverlay => (
                Behavior::ClockOverlay(ClockState::new(self.tick_rate, self.clock.foreground, self.clock.border)),
                flags,
            ),
        };
        let mut window = self.build(kind, title, geometry, flags, behavior)?;
        match kind {
            WindowKind::Splash => window.core_mut().background = self.splash.background,
            WindowKind::ClockOverlay => window.core_mut().background = self.clock.background,
            _ => {}
        }
        Ok(window)
    }

    /// Create from a raw archetype id.
    ///
    /// # Panics
    ///
    /// An unknown archetype id is a programming error and halts.
    pub fn create_archetype(&mut self, archetype: u32, title: &str, flags: WindowFlags) -> Result<Window> {
        match WindowKind::try_from(archetype) {
            Ok(kind) => self.create(kind, title, flags),
            Err(e) => panic!("create_archetype: {}", e),
        }
    }

    /// Boot splash at the configured placement, fully opaque.
    pub fn splash(&mut self, title: &str, flags: WindowFlags) -> Result<Window> {
        let s = &self.splash;
        let geometry = WindowGeometry::new(s.x, s.y, s.width, s.height);
        self.create_at(WindowKind::Splash, title, geometry, flags)
    }

    pub fn splash_with_image(&mut self, title: &str, flags: WindowFlags, image: Surface) -> Result<Window> {
        let mut window = self.splash(title, flags)?;
        if let Behavior::Splash(state) = window.behavior_mut() {
            state.image = Some(image);
        }
        Ok(window)
    }

    pub fn clock_overlay(&mut self, title: &str, flags: WindowFlags) -> Result<Window> {
        let c = &self.clock;
        let geometry = WindowGeometry::new(c.x, c.y, c.width, c.height);
        self.create_at(WindowKind::ClockOverlay, title, geometry, flags)
    }

    /// Window driven by a caller supplied behavior
    pub fn custom(
        &mut self,
        title: &str,
        geometry: WindowGeometry,
        flags: WindowFlags,
        behavior: Box<dyn WindowBehavior + Send>,
    ) -> Result<Window> {
        self.build(WindowKind::Custom, title, geometry, flags, Behavior::Custom(behavior))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> WindowFactory {
        WindowFactory::new(&QarmaConfig::default())
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut f = factory();
        let a = f.create(WindowKind::Generic, "a", WindowFlags::VISIBLE).unwrap();
        let b = f.create(WindowKind::Dialog, "b", WindowFlags::VISIBLE).unwrap();
        assert_eq!(a.id(), WindowId::new(1));
        assert_eq!(b.id(), WindowId::new(2));
    }

    #[test]
    fn archetypes_get_their_stock_geometry() {
        let mut f = factory();
        let splash = f.create_archetype(1, "splash", WindowFlags::VISIBLE).unwrap();
        let c = splash.core();
        assert_eq!((c.x, c.y, c.width(), c.height()), (30, 10, 640, 480));
        assert_eq!(c.background.a, 255);
        assert!(c.flags.contains(WindowFlags::FADE_OUT));
        assert!(matches!(splash.behavior(), Behavior::Splash(_)));

        let clock = f.create_archetype(5, "clock", WindowFlags::VISIBLE).unwrap();
        let c = clock.core();
        assert_eq!((c.x, c.y, c.width(), c.height()), (700, 10, 80, 20));
        assert_eq!(c.background.a, 128);

        let generic = f.create(WindowKind::Generic, "g", WindowFlags::empty()).unwrap();
        assert_eq!((generic.core().x, generic.core().width(), generic.core().height()), (100, 480, 640));

        let modal = f.create(WindowKind::Modal, "m", WindowFlags::VISIBLE).unwrap();
        assert!(modal.core().flags.contains(WindowFlags::MODAL));
    }

    #[test]
    fn buffer_matches_size() {
        let mut f = factory();
        let w = f.create_at(WindowKind::Generic, "g", WindowGeometry::new(0, 0, 13, 7), WindowFlags::VISIBLE).unwrap();
        assert_eq!(w.core().surface().pixels().len(), 13 * 7);
    }

    #[test]
    fn allocation_failure_returns_no_window_and_keeps_ids() {
        let mut f = factory();
        let huge = WindowGeometry::new(0, 0, u32::MAX, u32::MAX);
        assert!(matches!(
            f.create_at(WindowKind::Generic, "huge", huge, WindowFlags::VISIBLE),
            Err(QarmaError::AllocationFailed { .. })
        ));
        let next = f.create(WindowKind::Generic, "ok", WindowFlags::VISIBLE).unwrap();
        assert_eq!(next.id(), WindowId::new(1));
    }

    #[test]
    fn id_space_exhaustion_is_reported() {
        let mut f = factory();
        f.next_id = u32::MAX;
        assert!(matches!(f.create(WindowKind::Generic, "x", WindowFlags::VISIBLE), Err(QarmaError::IdSpaceExhausted)));
    }

    #[test]
    #[should_panic(expected = "unknown window archetype")]
    fn unknown_archetype_halts() {
        let _ = factory().create_archetype(42, "??", WindowFlags::VISIBLE);
    }
}

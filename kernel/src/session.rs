//! QARMA session
//!
//! The one context object holding the scheduler, the window manager and
//! the window factory. The kernel builds it once at boot, drives it with
//! [`Qarma::tick`] from its main loop and tears it down with
//! [`Qarma::shutdown`].

use alloc::borrow::Cow;
use alloc::boxed::Box;

use log::{info, warn};
use spin::Mutex;

use crate::compositor::Compositor;
use crate::config::QarmaConfig;
use crate::error::Result;
use crate::framebuffer::FrameSink;
use crate::scheduler::{Event, Module, Pid, Priority, ProcessMain, Scheduler, TickContext};
use crate::time::{TickCounter, TickSource};
use crate::window::{WindowBehavior, WindowFactory, WindowFlags, WindowGeometry, WindowId, WindowKind};
use crate::wm::{WindowManager, WindowRegistry};

const TARGET: &str = "qarma";

pub struct Qarma<S> {
    config: QarmaConfig,
    scheduler: Scheduler<S>,
    wm: WindowManager,
    factory: WindowFactory,
}

impl<S: TickSource> Qarma<S> {
    /// Build the desktop core and apply the configured log level.
    /// Rendering stays off until a framebuffer is attached; everything
    /// else runs regardless.
    pub fn new(config: QarmaConfig, source: S) -> Result<Self> {
        log::set_max_level(config.log_level);
        let display = &config.display;
        let compositor = Compositor::new(display.width, display.height, display.desktop)?;
        let registry = WindowRegistry::new(config.windows.max_windows);
        let scheduler = Scheduler::new(source, &config.scheduler);
        let factory = WindowFactory::new(&config);

        info!(target: TARGET, "desktop {}x{}, {} window slots", display.width, display.height, config.windows.max_windows);
        Ok(Self { wm: WindowManager::new(registry, compositor), scheduler, factory, config })
    }

    pub fn config(&self) -> &QarmaConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<S> {
        &mut self.scheduler
    }

    pub fn wm(&self) -> &WindowManager {
        &self.wm
    }

    pub fn wm_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn factory_mut(&mut self) -> &mut WindowFactory {
        &mut self.factory
    }

    pub fn attach_framebuffer(&mut self, framebuffer: Box<dyn FrameSink + Send>) {
        info!(target: TARGET, "framebuffer {}x{} attached", framebuffer.width(), framebuffer.height());
        self.wm.compositor_mut().attach_framebuffer(framebuffer);
    }

    /// Open the stock boot windows: the splash and the clock overlay,
    /// each when enabled. A failure is logged and boot carries on.
    pub fn boot(&mut self) {
        if self.config.splash.enabled {
            if let Err(e) = self.spawn_splash("QARMA") {
                warn!(target: TARGET, "no splash: {}", e);
            }
        }
        if self.config.clock.enabled {
            if let Err(e) = self.spawn_clock("clock") {
                warn!(target: TARGET, "no clock: {}", e);
            }
        }
    }

    pub fn register_module(&mut self, name: impl Into<Cow<'static, str>>, module: Box<dyn Module + Send>) -> Result<()> {
        self.scheduler.register_module(name, module)
    }

    pub fn create_process<P>(&mut self, priority: Priority, main: P) -> Result<Pid>
    where
        P: ProcessMain + Send + 'static,
    {
        self.scheduler.create_process(priority, main)
    }

    /// One frame: modules and processes, then windows, then the screen if
    /// anything changed. `None` after shutdown.
    pub fn tick(&mut self) -> Option<TickContext> {
        let ctx = self.scheduler.tick()?;
        self.wm.update_all(&ctx);
        self.wm.compose();
        Some(ctx)
    }

    /// Feed one decoded keycode: interactive windows get printable
    /// characters, modules get an `Input` event either way.
    pub fn handle_key(&mut self, keycode: u8) -> usize {
        let windows = self.wm.dispatch_key(keycode);
        self.scheduler.dispatch_event(&Event::key(keycode));
        windows
    }

    pub fn spawn_window(&mut self, kind: WindowKind, title: &str, flags: WindowFlags) -> Result<WindowId> {
        let window = self.factory.create(kind, title, flags)?;
        self.wm.add(window, "session")
    }

    pub fn spawn_window_at(&mut self, kind: WindowKind, title: &str, geometry: WindowGeometry, flags: WindowFlags) -> Result<WindowId> {
        let window = self.factory.create_at(kind, title, geometry, flags)?;
        self.wm.add(window, "session")
    }

    pub fn spawn_splash(&mut self, title: &str) -> Result<WindowId> {
        let window = self.factory.splash(title, WindowFlags::VISIBLE)?;
        self.wm.add(window, "boot")
    }

    pub fn spawn_clock(&mut self, title: &str) -> Result<WindowId> {
        let window = self.factory.clock_overlay(title, WindowFlags::VISIBLE | WindowFlags::TOPMOST)?;
        self.wm.add(window, "boot")
    }

    pub fn spawn_custom(
        &mut self,
        title: &str,
        geometry: WindowGeometry,
        flags: WindowFlags,
        behavior: Box<dyn WindowBehavior + Send>,
    ) -> Result<WindowId> {
        let window = self.factory.custom(title, geometry, flags, behavior)?;
        self.wm.add(window, "session")
    }

    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        self.wm.remove(id)
    }

    /// Stop the scheduler (two-phase module teardown), then destroy every
    /// window. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
        self.wm.destroy_all();
    }
}

// ============================================================
// Global session instance
// ============================================================
static QARMA: Mutex<Option<Qarma<&'static TickCounter>>> = Mutex::new(None);

/// Install the kernel's session, replacing (and shutting down) any
/// previous one.
pub fn install(qarma: Qarma<&'static TickCounter>) {
    let previous = QARMA.lock().replace(qarma);
    if let Some(mut old) = previous {
        warn!(target: TARGET, "replacing running session");
        old.shutdown();
    }
}

/// Run `f` against the installed session, if any.
pub fn with_qarma<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Qarma<&'static TickCounter>) -> R,
{
    QARMA.lock().as_mut().map(f)
}

/// Remove the installed session, shutting it down.
pub fn uninstall() {
    // shut down outside the lock; callbacks may reach for the session
    let taken = QARMA.lock().take();
    if let Some(mut qarma) = taken {
        qarma.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::Surface;
    use crate::scheduler::{EventKind, ModuleCaps, ProcessControl};
    use crate::window::{UpdateOutcome, WindowCore};
    use alloc::format;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Listener(Journal);

    impl Module for Listener {
        fn capabilities(&self) -> ModuleCaps {
            ModuleCaps::SHUTDOWN | ModuleCaps::EVENTS
        }

        fn shutdown(&mut self) {
            self.0.lock().push(String::from("shutdown"));
        }

        fn handle_event(&mut self, event: &Event) {
            self.0.lock().push(format!("{:?}", event.kind));
        }
    }

    struct Sticky(Journal);

    impl WindowBehavior for Sticky {
        fn update(&mut self, _core: &mut WindowCore, _ctx: &TickContext) -> UpdateOutcome {
            UpdateOutcome::Continue
        }

        fn destroy(&mut self, _core: &mut WindowCore) {
            self.0.lock().push(String::from("window destroyed"));
        }
    }

    fn small_config() -> QarmaConfig {
        let mut config = QarmaConfig::default();
        config.display.width = 64;
        config.display.height = 48;
        config.splash.x = 0;
        config.splash.y = 0;
        config.splash.width = 32;
        config.splash.height = 24;
        config.clock.x = 40;
        config.clock.y = 2;
        config.log_level = log::LevelFilter::Trace;
        config
    }

    /// Looks for the global session while being torn down.
    struct Reentrant(Journal);

    impl Module for Reentrant {
        fn capabilities(&self) -> ModuleCaps {
            ModuleCaps::SHUTDOWN
        }

        fn shutdown(&mut self) {
            let seen = with_qarma(|_| ()).is_some();
            self.0.lock().push(format!("session visible: {}", seen));
        }
    }

    fn session(config: QarmaConfig) -> (Arc<TickCounter>, Qarma<Arc<TickCounter>>) {
        let pit = Arc::new(TickCounter::new(1000));
        let qarma = Qarma::new(config, pit.clone()).unwrap();
        (pit, qarma)
    }

    #[test]
    fn boot_opens_splash_and_clock() {
        let (_, mut q) = session(small_config());
        q.boot();
        let kinds: Vec<_> = q.wm().registry().iter().map(|w| w.kind()).collect();
        assert_eq!(kinds, [WindowKind::Splash, WindowKind::ClockOverlay]);
    }

    #[test]
    fn disabled_archetypes_are_not_opened() {
        let mut config = small_config();
        config.splash.enabled = false;
        config.clock.enabled = false;
        let (_, mut q) = session(config);
        q.boot();
        assert!(q.wm().is_empty());
    }

    #[test]
    fn splash_fades_out_and_clock_stays() {
        let mut config = small_config();
        config.splash.fade_speed = 0.5;
        let (pit, mut q) = session(config);
        q.attach_framebuffer(Box::new(Surface::try_new(64, 48).unwrap()));
        q.boot();

        for _ in 0..22 {
            pit.advance(100);
            assert!(q.tick().is_some());
        }
        let kinds: Vec<_> = q.wm().registry().iter().map(|w| w.kind()).collect();
        assert_eq!(kinds, [WindowKind::ClockOverlay]);
        assert!(q.wm().compositor().stats().frames_composed > 0);
    }

    #[test]
    fn headless_session_keeps_ticking() {
        let (pit, mut q) = session(small_config());
        let runs = Arc::new(Mutex::new(0u32));
        let counter = runs.clone();
        q.create_process(Priority::Normal, move |_: &TickContext, _: &mut ProcessControl| {
            *counter.lock() += 1;
        })
        .unwrap();
        q.boot();

        for _ in 0..5 {
            pit.advance(16);
            q.tick();
        }
        assert_eq!(*runs.lock(), 5);
        assert!(q.wm().is_dirty());
        assert_eq!(q.wm().compositor().stats().frames_composed, 0);
    }

    #[test]
    fn keys_reach_windows_and_modules() {
        let journal: Journal = Arc::default();
        let (_, mut q) = session(small_config());
        q.register_module("listener", Box::new(Listener(journal.clone()))).unwrap();
        q.spawn_window_at(
            WindowKind::Debug,
            "console",
            WindowGeometry::new(0, 0, 64, 20),
            WindowFlags::VISIBLE | WindowFlags::INTERACTIVE,
        )
        .unwrap();

        assert_eq!(q.handle_key(b'x'), 1);
        assert_eq!(q.handle_key(0x08), 0);
        assert_eq!(*journal.lock(), ["Input", "Input"]);
    }

    #[test]
    fn shutdown_tears_down_modules_then_windows() {
        let journal: Journal = Arc::default();
        let (pit, mut q) = session(small_config());
        q.register_module("listener", Box::new(Listener(journal.clone()))).unwrap();
        q.spawn_custom("sticky", WindowGeometry::new(0, 0, 4, 4), WindowFlags::VISIBLE, Box::new(Sticky(journal.clone())))
            .unwrap();

        q.shutdown();
        q.shutdown();
        assert_eq!(
            *journal.lock(),
            [String::from("shutdown"), format!("{:?}", EventKind::Shutdown), String::from("window destroyed")]
        );
        assert!(q.wm().is_empty());
        pit.advance(100);
        assert!(q.tick().is_none());
    }

    #[test]
    fn global_session_accessors() {
        static PIT: TickCounter = TickCounter::new(1000);
        assert!(with_qarma(|_| ()).is_none());

        install(Qarma::new(small_config(), &PIT).unwrap());
        let id = with_qarma(|q| q.spawn_window(WindowKind::Dialog, "about", WindowFlags::VISIBLE)).unwrap().unwrap();
        assert_eq!(with_qarma(|q| q.wm().len()), Some(1));
        assert_eq!(with_qarma(|q| q.close_window(id)), Some(Ok(())));

        let journal: Journal = Arc::default();
        with_qarma(|q| q.register_module("reentrant", Box::new(Reentrant(journal.clone())))).unwrap().unwrap();
        uninstall();
        assert!(with_qarma(|_| ()).is_none());
        assert_eq!(*journal.lock(), ["session visible: false"]);
    }

    #[test]
    fn session_applies_log_level() {
        let (_, q) = session(small_config());
        assert_eq!(q.config().log_level, log::LevelFilter::Trace);
        assert_eq!(log::max_level(), log::LevelFilter::Trace);
    }
}

//! Window Manager
//!
//! Owns the registry and the compositor and drives the per-tick window
//! passes. Windows never remove themselves: an update that returns
//! [`UpdateOutcome::Destroy`] is queued and applied after the pass, so
//! iteration never skips or revisits a slot.

mod registry;
#[cfg(test)]
mod tests_prop;

use alloc::vec::Vec;

use log::{debug, info, warn};

pub use registry::WindowRegistry;

use crate::compositor::Compositor;
use crate::error::Result;
use crate::input;
use crate::scheduler::TickContext;
use crate::window::{UpdateOutcome, Window, WindowFlags, WindowId};

const TARGET: &str = "qarma::wm";

pub struct WindowManager {
    registry: WindowRegistry,
    compositor: Compositor,
}

impl WindowManager {
    pub fn new(registry: WindowRegistry, compositor: Compositor) -> Self {
        Self { registry, compositor }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.registry.get(id)
    }

    /// Direct access to a registered window. Changes that affect the
    /// screen should set the window's dirty flag.
    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.registry.get_mut(id)
    }

    pub fn mark_dirty(&mut self) {
        self.compositor.mark_dirty();
    }

    pub fn is_dirty(&self) -> bool {
        self.compositor.is_dirty()
    }

    /// Register `window` on top of the others and force a recompose.
    /// `caller` is recorded as the window's owner.
    ///
    /// A window that does not fit is destroyed and the error returned.
    pub fn add(&mut self, mut window: Window, caller: &'static str) -> Result<WindowId> {
        window.core_mut().owner = Some(caller);
        match self.registry.add(window) {
            Ok(id) => {
                info!(target: TARGET, "[{}] added window {} ({} open)", caller, id, self.registry.len());
                self.compositor.mark_dirty();
                Ok(id)
            }
            Err((err, window)) => {
                warn!(target: TARGET, "[{}] {}; rejecting window {}", caller, err, window.id());
                window.destroy();
                Err(err)
            }
        }
    }

    /// Unregister and destroy a window.
    pub fn remove(&mut self, id: WindowId) -> Result<()> {
        match self.registry.remove(id) {
            Ok(window) => {
                window.destroy();
                self.compositor.mark_dirty();
                debug!(target: TARGET, "removed window {} ({} open)", id, self.registry.len());
                Ok(())
            }
            Err(err) => {
                warn!(target: TARGET, "remove: {}", err);
                Err(err)
            }
        }
    }

    /// Update every window in order. A window's dirty flag is moved onto
    /// the screen-wide flag. Windows asking to be destroyed are removed
    /// once the pass is over. Returns how many were removed.
    pub fn update_all(&mut self, ctx: &TickContext) -> usize {
        let count = self.registry.len();
        let mut finished: Vec<WindowId> = Vec::new();

        for index in 0..count {
            let Some(window) = self.registry.get_index_mut(index) else {
                break;
            };
            if window.update(ctx) == UpdateOutcome::Destroy {
                finished.push(window.id());
            }
            if window.take_dirty() {
                self.compositor.mark_dirty();
            }
        }

        let removed = finished.len();
        for id in finished {
            if let Err(e) = self.remove(id) {
                debug!(target: TARGET, "sweep: {}", e);
            }
        }
        removed
    }

    /// Render every visible window into its buffer, then blit them all.
    pub fn render_all(&mut self) -> bool {
        for window in self.registry.iter_mut() {
            if window.is_visible() {
                window.render();
            }
        }
        self.compositor.present(self.registry.iter())
    }

    /// Recompose if anything is dirty. See [`Compositor::compose`].
    pub fn compose(&mut self) -> bool {
        self.compositor.compose(self.registry.iter_mut())
    }

    /// Destroy every window. Used at shutdown.
    pub fn destroy_all(&mut self) {
        let n = self.registry.len();
        for window in self.registry.drain() {
            window.destroy();
        }
        if n > 0 {
            info!(target: TARGET, "destroyed {} windows", n);
            self.compositor.mark_dirty();
        }
    }

    /// Deliver a keycode to every visible interactive window. Only
    /// printable codes are translated; the rest are ignored here.
    /// Returns how many windows got the character.
    pub fn dispatch_key(&mut self, keycode: u8) -> usize {
        let Some(ch) = input::printable(keycode) else {
            return 0;
        };
        let mut delivered = 0;
        for window in self.registry.iter_mut() {
            if !window.is_visible() || !window.core().flags.contains(WindowFlags::INTERACTIVE) {
                continue;
            }
            window.on_char(ch);
            delivered += 1;
            if window.take_dirty() {
                self.compositor.mark_dirty();
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QarmaConfig;
    use crate::gfx::{Color, Surface};
    use crate::window::{WindowBehavior, WindowCore, WindowFactory, WindowGeometry, WindowKind};
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use alloc::vec;
    use spin::Mutex;

    type Journal = Arc<Mutex<Vec<(u32, &'static str)>>>;

    /// Records its callbacks and destroys itself after `lifetime` updates.
    struct Tracer {
        tag: u32,
        lifetime: Option<u32>,
        journal: Journal,
    }

    impl WindowBehavior for Tracer {
        fn update(&mut self, core: &mut WindowCore, _ctx: &TickContext) -> UpdateOutcome {
            self.journal.lock().push((self.tag, "update"));
            core.dirty = true;
            match self.lifetime.as_mut() {
                Some(0) => UpdateOutcome::Destroy,
                Some(n) => {
                    *n -= 1;
                    if *n == 0 {
                        UpdateOutcome::Destroy
                    } else {
                        UpdateOutcome::Continue
                    }
                }
                None => UpdateOutcome::Continue,
            }
        }

        fn render(&mut self, _core: &mut WindowCore) {
            self.journal.lock().push((self.tag, "render"));
        }

        fn destroy(&mut self, _core: &mut WindowCore) {
            self.journal.lock().push((self.tag, "destroy"));
        }
    }

    fn manager(capacity: usize) -> WindowManager {
        let mut compositor = Compositor::new(16, 16, Color::BLACK).unwrap();
        compositor.attach_framebuffer(Box::new(Surface::try_new(16, 16).unwrap()));
        WindowManager::new(WindowRegistry::new(capacity), compositor)
    }

    fn tracer(f: &mut WindowFactory, tag: u32, lifetime: Option<u32>, journal: &Journal) -> Window {
        f.custom(
            "tracer",
            WindowGeometry::new(0, 0, 2, 2),
            WindowFlags::VISIBLE,
            Box::new(Tracer { tag, lifetime, journal: journal.clone() }),
        )
        .unwrap()
    }

    fn ctx(delta_time: f32) -> TickContext {
        TickContext { tick_count: 0, delta_time, uptime_seconds: 0.0 }
    }

    #[test]
    fn add_marks_dirty_and_full_registry_rejects() {
        let journal: Journal = Arc::default();
        let mut f = WindowFactory::new(&QarmaConfig::default());
        let mut wm = manager(2);
        wm.compose();
        assert!(!wm.is_dirty());

        let first = wm.add(tracer(&mut f, 1, None, &journal), "test").unwrap();
        assert!(wm.is_dirty());
        assert_eq!(wm.get(first).unwrap().core().owner, Some("test"));
        wm.add(tracer(&mut f, 2, None, &journal), "test").unwrap();
        assert!(wm.add(tracer(&mut f, 3, None, &journal), "test").is_err());
        assert_eq!(wm.len(), 2);
        // the rejected window was torn down, the others untouched
        assert_eq!(*journal.lock(), vec![(3, "destroy")]);
    }

    #[test]
    fn remove_unknown_id_is_reported() {
        let mut wm = manager(4);
        assert!(wm.remove(WindowId::new(99)).is_err());
    }

    #[test]
    fn self_destruction_does_not_skip_neighbours() {
        let journal: Journal = Arc::default();
        let mut f = WindowFactory::new(&QarmaConfig::default());
        let mut wm = manager(8);
        wm.add(tracer(&mut f, 1, Some(1), &journal), "t").unwrap();
        wm.add(tracer(&mut f, 2, None, &journal), "t").unwrap();
        wm.add(tracer(&mut f, 3, Some(1), &journal), "t").unwrap();

        assert_eq!(wm.update_all(&ctx(0.016)), 2);
        assert_eq!(
            *journal.lock(),
            vec![(1, "update"), (2, "update"), (3, "update"), (1, "destroy"), (3, "destroy")]
        );
        assert_eq!(wm.registry().ids().collect::<Vec<_>>(), [WindowId::new(2)]);

        journal.lock().clear();
        wm.update_all(&ctx(0.016));
        assert_eq!(*journal.lock(), vec![(2, "update")]);
    }

    #[test]
    fn window_dirt_moves_to_the_screen() {
        let journal: Journal = Arc::default();
        let mut f = WindowFactory::new(&QarmaConfig::default());
        let mut wm = manager(4);
        let id = wm.add(tracer(&mut f, 1, None, &journal), "t").unwrap();
        wm.compose();
        assert!(!wm.is_dirty());

        wm.update_all(&ctx(0.016));
        assert!(wm.is_dirty());
        assert!(!wm.get_mut(id).unwrap().take_dirty());
    }

    #[test]
    fn splash_leaves_registry_when_faded() {
        let mut config = QarmaConfig::default();
        config.splash.fade_speed = 0.5;
        config.splash.width = 4;
        config.splash.height = 4;
        let mut f = WindowFactory::new(&config);
        let mut wm = manager(4);
        wm.add(f.splash("splash", WindowFlags::VISIBLE).unwrap(), "boot").unwrap();

        let mut ticks = 0;
        while !wm.is_empty() {
            ticks += 1;
            wm.update_all(&ctx(0.1));
            wm.compose();
            assert!(ticks <= 22);
        }
        assert_eq!(ticks, 22);
        // nothing left to call
        assert_eq!(wm.update_all(&ctx(0.1)), 0);
    }

    #[test]
    fn render_all_skips_hidden_windows() {
        let journal: Journal = Arc::default();
        let mut f = WindowFactory::new(&QarmaConfig::default());
        let mut wm = manager(4);
        wm.add(tracer(&mut f, 1, None, &journal), "t").unwrap();
        let hidden = wm.add(tracer(&mut f, 2, None, &journal), "t").unwrap();
        wm.get_mut(hidden).unwrap().set_visible(false);

        assert!(wm.render_all());
        assert_eq!(*journal.lock(), vec![(1, "render")]);
        assert!(!wm.is_dirty());
    }

    #[test]
    fn keys_reach_interactive_windows_only() {
        let mut f = WindowFactory::new(&QarmaConfig::default());
        let mut wm = manager(4);
        let console = f.create(WindowKind::Debug, "console", WindowFlags::VISIBLE | WindowFlags::INTERACTIVE).unwrap();
        let console = wm.add(console, "t").unwrap();
        wm.add(f.create(WindowKind::Dialog, "d", WindowFlags::VISIBLE).unwrap(), "t").unwrap();
        wm.compose();

        assert_eq!(wm.dispatch_key(b'h'), 1);
        assert_eq!(wm.dispatch_key(0x1B), 0);
        assert!(wm.is_dirty());
        let input = wm.get_mut(console).unwrap().console_mut().unwrap().input().len();
        assert_eq!(input, 1);
    }

    #[test]
    fn destroy_all_empties_the_registry() {
        let journal: Journal = Arc::default();
        let mut f = WindowFactory::new(&QarmaConfig::default());
        let mut wm = manager(4);
        for tag in 1..=3 {
            wm.add(tracer(&mut f, tag, None, &journal), "t").unwrap();
        }
        wm.destroy_all();
        assert!(wm.is_empty());
        let destroyed = journal.lock().iter().filter(|(_, what)| *what == "destroy").count();
        assert_eq!(destroyed, 3);
    }
}

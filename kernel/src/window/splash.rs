//! Boot splash
//!
//! Fades its background alpha towards zero and asks to be destroyed on
//! the tick it gets there.

use log::debug;

use super::behavior::{UpdateOutcome, WindowBehavior};
use super::WindowCore;
use crate::gfx::blend::scale_alpha;
use crate::gfx::{Color, Surface};
use crate::scheduler::TickContext;

pub struct SplashState {
    /// Full fades per second
    pub fade_speed: f32,
    /// Decoded splash image, if the decoder produced one
    pub image: Option<Surface>,
    /// Painted instead of the image when there is none
    pub fallback: Color,
}

impl SplashState {
    pub fn new(fade_speed: f32, fallback: Color) -> Self {
        Self { fade_speed, image: None, fallback }
    }

    pub fn with_image(mut self, image: Surface) -> Self {
        self.image = Some(image);
        self
    }
}

/// Alpha lost over `delta_time` seconds: `trunc(delta * 255 * speed)`,
/// at least 1 whenever both factors are positive.
pub fn decay(delta_time: f32, fade_speed: f32) -> u8 {
    if !(delta_time > 0.0 && fade_speed > 0.0) {
        return 0;
    }
    let raw = delta_time * 255.0 * fade_speed;
    if raw >= 255.0 {
        255
    } else {
        (raw as u8).max(1)
    }
}

impl WindowBehavior for SplashState {
    fn update(&mut self, core: &mut WindowCore, ctx: &TickContext) -> UpdateOutcome {
        let a = core.background.a;
        if a == 0 {
            return UpdateOutcome::Destroy;
        }

        core.background.a = a.saturating_sub(decay(ctx.delta_time, self.fade_speed));
        core.dirty = true;

        if core.background.a == 0 {
            UpdateOutcome::Destroy
        } else {
            UpdateOutcome::Continue
        }
    }

    fn render(&mut self, core: &mut WindowCore) {
        let alpha = core.background.a;
        let background = core.background.to_argb();
        let fallback = self.fallback.with_alpha(alpha).to_argb();
        let surface = core.surface_mut();

        match &self.image {
            Some(image) => {
                surface.fill(background);
                let x = (surface.width() as i32 - image.width() as i32) / 2;
                let y = (surface.height() as i32 - image.height() as i32) / 2;
                let opacity = alpha as f32 / 255.0;
                // keep the image's own alpha channel, scaled by the fade
                for row in 0..image.height() as i32 {
                    for col in 0..image.width() as i32 {
                        if let Some(p) = image.get(col, row) {
                            surface.put(x + col, y + row, scale_alpha(p, opacity));
                        }
                    }
                }
            }
            None => surface.fill(fallback),
        }
    }

    fn destroy(&mut self, core: &mut WindowCore) {
        debug!(target: "qarma::splash", "splash {} faded out", core.id());
        self.image = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{WindowFlags, WindowId, WindowKind};

    fn core(w: u32, h: u32) -> WindowCore {
        let mut c = WindowCore::new(
            WindowId::new(1),
            WindowKind::Splash,
            "splash".into(),
            WindowFlags::VISIBLE | WindowFlags::FADE_OUT,
            0,
            0,
            Surface::try_new(w, h).unwrap(),
        );
        c.background = Color::new(0, 0, 0, 255);
        c
    }

    fn ctx(delta_time: f32) -> TickContext {
        TickContext { tick_count: 0, delta_time, uptime_seconds: 0.0 }
    }

    #[test]
    fn decay_truncates_with_floor_of_one() {
        assert_eq!(decay(0.1, 0.5), 12);
        assert_eq!(decay(0.001, 1.0), 1);
        assert_eq!(decay(0.0, 1.0), 0);
        assert_eq!(decay(0.1, 0.0), 0);
        assert_eq!(decay(10.0, 10.0), 255);
    }

    #[test]
    fn alpha_strictly_decreases_to_zero() {
        let mut splash = SplashState::new(0.5, Color::MAGENTA);
        let mut c = core(4, 4);
        let mut previous = c.background.a;
        let mut ticks = 0;
        loop {
            ticks += 1;
            let outcome = splash.update(&mut c, &ctx(0.1));
            assert!(c.background.a < previous);
            assert!(c.dirty);
            previous = c.background.a;
            if outcome == UpdateOutcome::Destroy {
                break;
            }
            assert!(ticks < 64, "fade did not terminate");
        }
        assert_eq!(c.background.a, 0);
        // 255 / 12 -> 21 full steps, then the remaining 3
        assert_eq!(ticks, 22);
    }

    #[test]
    fn zero_delta_holds_alpha() {
        let mut splash = SplashState::new(1.0, Color::MAGENTA);
        let mut c = core(1, 1);
        assert_eq!(splash.update(&mut c, &ctx(0.0)), UpdateOutcome::Continue);
        assert_eq!(c.background.a, 255);
    }

    #[test]
    fn fallback_fill_without_image() {
        let mut splash = SplashState::new(1.0, Color::MAGENTA);
        let mut c = core(3, 2);
        c.background.a = 100;
        splash.render(&mut c);
        assert!(c.surface().pixels().iter().all(|&p| p == 0x64FF00FF));
    }

    #[test]
    fn image_is_centered() {
        let image = Surface::filled(2, 2, 0xFF00FF00).unwrap();
        let mut splash = SplashState::new(1.0, Color::MAGENTA).with_image(image);
        let mut c = core(4, 4);
        splash.render(&mut c);
        assert_eq!(c.surface().get(1, 1), Some(0xFF00FF00));
        assert_eq!(c.surface().get(2, 2), Some(0xFF00FF00));
        assert_eq!(c.surface().get(0, 0), Some(0xFF000000));
        assert_eq!(c.surface().get(3, 3), Some(0xFF000000));
    }
}

//! Modal and dialog panels: a bordered box with a title bar.

use super::behavior::WindowBehavior;
use super::WindowCore;
use crate::gfx::{draw, Color, Font8x8, GLYPH_HEIGHT};

const TITLE_PAD: u32 = 2;

#[derive(Debug, Clone)]
pub struct PanelState {
    pub border: Color,
    pub title_bar: Color,
    pub title_text: Color,
}

impl Default for PanelState {
    fn default() -> Self {
        Self { border: Color::STEEL_BLUE, title_bar: Color::STEEL_BLUE, title_text: Color::WHITE }
    }
}

impl PanelState {
    pub fn title_bar_height() -> u32 {
        GLYPH_HEIGHT + 2 * TITLE_PAD
    }
}

impl WindowBehavior for PanelState {
    fn render(&mut self, core: &mut WindowCore) {
        let (w, h) = (core.width(), core.height());
        let background = core.background.to_argb();
        let title_h = Self::title_bar_height().min(h);
        let title = core.title.clone();
        let surface = core.surface_mut();

        surface.fill(background);
        draw::fill_rect(surface, 0, 0, w, title_h, self.title_bar.to_argb());
        draw::draw_text(surface, &Font8x8, TITLE_PAD as i32 + 2, TITLE_PAD as i32, &title, self.title_text.to_argb());
        draw::draw_rect(surface, 0, 0, w, h, self.border.to_argb());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::Surface;
    use crate::window::{WindowFlags, WindowId, WindowKind};

    #[test]
    fn draws_title_bar_over_background() {
        let mut core = WindowCore::new(
            WindowId::new(3),
            WindowKind::Dialog,
            "Hi".into(),
            WindowFlags::VISIBLE,
            0,
            0,
            Surface::try_new(40, 30).unwrap(),
        );
        core.background = Color::rgb(0x20, 0x20, 0x20);
        let mut panel = PanelState { border: Color::GREEN, ..PanelState::default() };
        panel.render(&mut core);

        let s = core.surface();
        assert_eq!(s.get(0, 15), Some(Color::GREEN.to_argb()));
        assert_eq!(s.get(39, 29), Some(Color::GREEN.to_argb()));
        assert_eq!(s.get(30, 5), Some(Color::STEEL_BLUE.to_argb()));
        assert_eq!(s.get(20, 20), Some(0xFF202020));
    }
}

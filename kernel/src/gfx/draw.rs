//! Drawing primitives for window buffers.
//!
//! Everything here paints into a [`Surface`] and clips against its bounds.

use core::ops::Range;

use super::font::{GlyphSource, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::surface::Surface;

/// Fill a rectangle.
pub fn fill_rect(s: &mut Surface, x: i32, y: i32, w: u32, h: u32, color: u32) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x as i64 + w as i64).min(s.width() as i64) as i32;
    let y1 = (y as i64 + h as i64).min(s.height() as i64) as i32;
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let stride = s.width() as usize;
    let px = s.pixels_mut();
    for row in y0..y1 {
        let base = row as usize * stride;
        px[base + x0 as usize..base + x1 as usize].fill(color);
    }
}

/// Draw a 1 px rectangle outline.
pub fn draw_rect(s: &mut Surface, x: i32, y: i32, w: u32, h: u32, color: u32) {
    if w == 0 || h == 0 {
        return;
    }
    let right = (x as i64 + w as i64 - 1).min(i32::MAX as i64) as i32;
    let bottom = (y as i64 + h as i64 - 1).min(i32::MAX as i64) as i32;
    fill_rect(s, x, y, w, 1, color);
    fill_rect(s, x, bottom, w, 1, color);
    fill_rect(s, x, y, 1, h, color);
    fill_rect(s, right, y, 1, h, color);
}

/// Blend a rectangle using the alpha byte of `color`.
pub fn fill_rect_alpha(s: &mut Surface, x: i32, y: i32, w: u32, h: u32, color: u32) {
    let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let x1 = (x as i64 + w as i64).min(i32::MAX as i64) as i32;
    let y1 = (y as i64 + h as i64).min(i32::MAX as i64) as i32;
    for py in y.max(0)..y1.min(s.height() as i32) {
        for px in x.max(0)..x1.min(s.width() as i32) {
            s.blend_pixel(px, py, color, alpha);
        }
    }
}

/// Columns and rows of `s` within `reach` of `(cx, cy)`.
fn clip_box(s: &Surface, cx: i32, cy: i32, reach: i64) -> (Range<i32>, Range<i32>) {
    let span = |c: i32, len: u32| {
        let lo = (c as i64 - reach).max(0);
        let hi = (c as i64 + reach + 1).min(len as i64).max(lo);
        lo as i32..hi as i32
    };
    (span(cx, s.width()), span(cy, s.height()))
}

/// Anti-aliased circle outline.
///
/// Edge coverage is `1 - |distance - r|`, kept when in (0, 1], and the
/// color is blended over whatever is already there.
pub fn draw_circle(s: &mut Surface, cx: i32, cy: i32, r: u32, color: u32) {
    let rf = r as f32;
    let (cols, rows) = clip_box(s, cx, cy, r as i64 + 1);
    for py in rows {
        let dy = (py as i64 - cy as i64) as f32;
        for px in cols.clone() {
            let dx = (px as i64 - cx as i64) as f32;
            let dist = libm::sqrtf(dx * dx + dy * dy);
            let alpha = 1.0 - libm::fabsf(dist - rf);
            if alpha > 0.0 {
                s.blend_pixel(px, py, color, alpha.min(1.0));
            }
        }
    }
}

/// Fill a circle.
pub fn fill_circle(s: &mut Surface, cx: i32, cy: i32, r: u32, color: u32) {
    let r2 = r as i128 * r as i128;
    let (cols, rows) = clip_box(s, cx, cy, r as i64);
    for py in rows {
        let dy = py as i128 - cy as i128;
        for px in cols.clone() {
            let dx = px as i128 - cx as i128;
            if dx * dx + dy * dy <= r2 {
                s.put(px, py, color);
            }
        }
    }
}

/// Upper bound on ellipse samples, whatever the radii
const MAX_ELLIPSE_STEPS: u64 = 1 << 16;

/// Ellipse outline by parametric stepping.
pub fn draw_ellipse(s: &mut Surface, cx: i32, cy: i32, rx: u32, ry: u32, color: u32) {
    // enough steps that neighbouring samples touch
    let steps = (4 * (rx as u64 + ry as u64)).clamp(16, MAX_ELLIPSE_STEPS);
    let step = core::f32::consts::TAU / steps as f32;
    for i in 0..steps {
        let t = i as f32 * step;
        let x = cx as f32 + rx as f32 * libm::cosf(t);
        let y = cy as f32 + ry as f32 * libm::sinf(t);
        // float to int casts saturate
        s.put(libm::roundf(x) as i32, libm::roundf(y) as i32, color);
    }
}

/// Bresenham line.
pub fn draw_line(s: &mut Surface, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let mut x = x0;
    let mut y = y0;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: i32 = if x0 < x1 { 1 } else { -1 };
    let sy: i32 = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let max_steps = (dx.unsigned_abs() + dy.unsigned_abs()) as usize + 1;
    for _ in 0..max_steps {
        s.put(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Blit one glyph; only set bits are painted.
pub fn draw_char<F: GlyphSource + ?Sized>(s: &mut Surface, font: &F, x: i32, y: i32, ch: char, color: u32) {
    let rows = font.glyph_rows(ch);
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << col) != 0 {
                s.put(x.saturating_add(col as i32), y.saturating_add(row as i32), color);
            }
        }
    }
}

/// Draw a single line of text, advancing one glyph width per character.
pub fn draw_text<F: GlyphSource + ?Sized>(s: &mut Surface, font: &F, x: i32, y: i32, text: &str, color: u32) {
    let mut cx = x;
    for ch in text.chars() {
        if cx >= s.width() as i32 {
            break;
        }
        draw_char(s, font, cx, y, ch, color);
        cx += GLYPH_WIDTH as i32;
    }
}

/// Pixel extent of `text` drawn with [`draw_text`]
pub fn text_size(text: &str) -> (u32, u32) {
    (text.chars().count() as u32 * GLYPH_WIDTH, GLYPH_HEIGHT)
}

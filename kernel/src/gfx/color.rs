//! Explicit RGBA colors

use embedded_graphics_core::pixelcolor::Rgb888;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_argb(c: u32) -> Self {
        Self {
            a: ((c >> 24) & 0xFF) as u8,
            r: ((c >> 16) & 0xFF) as u8,
            g: ((c >> 8) & 0xFF) as u8,
            b: (c & 0xFF) as u8,
        }
    }

    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgb888(self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const STEEL_BLUE: Color = Color::rgb(0x46, 0x82, 0xB4);
    pub const DEEP_BLUE: Color = Color::rgb(0x10, 0x18, 0x40);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
}

impl From<u32> for Color {
    fn from(c: u32) -> Self {
        Color::from_argb(c)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> u32 {
        c.to_argb()
    }
}

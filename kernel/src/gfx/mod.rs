//! Pixel-plane graphics: colors, source-over blending, owned surfaces,
//! clipped drawing primitives and the 8x8 bitmap font.
//!
//! Pixels are packed `0xAARRGGBB` everywhere.

pub mod blend;
pub mod color;
pub mod draw;
pub mod font;
pub mod surface;

pub use blend::{blend_over, blend_with_alpha};
pub use color::Color;
pub use font::{Font8x8, GlyphSource, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use surface::Surface;

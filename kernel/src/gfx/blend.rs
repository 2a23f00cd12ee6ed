//! Source-over alpha blending
//!
//! `out = src * a + dst * (1 - a)` per channel with `a = alpha / 255`.
//! Channels are truncated, never rounded, and the result is always
//! opaque: composited screen pixels do not carry transparency forward.

/// Blend `src` over `dst` using the alpha byte of `src`.
#[inline]
pub fn blend_over(src: u32, dst: u32) -> u32 {
    blend_with_alpha(src, dst, ((src >> 24) & 0xFF) as f32 / 255.0)
}

/// Blend `src` over `dst` with an explicit coverage in `[0, 1]`.
#[inline]
pub fn blend_with_alpha(src: u32, dst: u32, alpha: f32) -> u32 {
    let a = alpha.clamp(0.0, 1.0);
    let inv = 1.0 - a;

    let channel = |shift: u32| -> u32 {
        let s = ((src >> shift) & 0xFF) as f32;
        let d = ((dst >> shift) & 0xFF) as f32;
        ((s * a + d * inv) as u32).min(255)
    };

    0xFF00_0000 | (channel(16) << 16) | (channel(8) << 8) | channel(0)
}

/// Scale the alpha byte of `color` by `opacity` in `[0, 1]`.
#[inline]
pub fn scale_alpha(color: u32, opacity: f32) -> u32 {
    let a = ((color >> 24) & 0xFF) as f32 * opacity.clamp(0.0, 1.0);
    ((a as u32) << 24) | (color & 0x00FF_FFFF)
}

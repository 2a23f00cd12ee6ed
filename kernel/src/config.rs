// ═══════════════════════════════════════════════════════════════════════════════
// QARMA Configuration
// ═══════════════════════════════════════════════════════════════════════════════
//
// INI-style configuration for the display, scheduler and window archetypes.
//
// Format:
// [section]
// key = value
// # comments
//
// ═══════════════════════════════════════════════════════════════════════════════

use alloc::format;
use alloc::string::String;
use core::str::FromStr;

use log::LevelFilter;

use crate::gfx::Color;

pub const MAX_WINDOWS: usize = 64;
pub const MAX_MODULES: usize = 32;
pub const MAX_PROCESSES: usize = 32;
pub const TICK_RATE: u32 = 60;

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// Backing store fill
    pub desktop: Color,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { width: 800, height: 600, desktop: Color::DEEP_BLUE }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Scheduler frames per second
    pub tick_rate: u32,
    pub max_modules: usize,
    pub max_processes: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { tick_rate: TICK_RATE, max_modules: MAX_MODULES, max_processes: MAX_PROCESSES }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub max_windows: usize,
    /// Placement of windows created without explicit geometry
    pub default_x: i32,
    pub default_y: i32,
    pub default_width: u32,
    pub default_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { max_windows: MAX_WINDOWS, default_x: 100, default_y: 100, default_width: 480, default_height: 640 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplashConfig {
    /// Show the splash at boot
    pub enabled: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Full fades per second
    pub fade_speed: f32,
    pub background: Color,
    /// Painted when no image was decoded
    pub fallback: Color,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            x: 30,
            y: 10,
            width: 640,
            height: 480,
            fade_speed: 1.0,
            background: Color::BLACK,
            fallback: Color::MAGENTA,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClockConfig {
    pub enabled: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub foreground: Color,
    pub background: Color,
    pub border: Color,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            x: 700,
            y: 10,
            width: 80,
            height: 20,
            foreground: Color::WHITE,
            background: Color::new(0, 0, 0, 128),
            border: Color::STEEL_BLUE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QarmaConfig {
    pub display: DisplayConfig,
    pub scheduler: SchedulerConfig,
    pub windows: WindowConfig,
    pub splash: SplashConfig,
    pub clock: ClockConfig,
    /// Applied with `log::set_max_level` when a session is built.
    pub log_level: LevelFilter,
}

impl Default for QarmaConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            scheduler: SchedulerConfig::default(),
            windows: WindowConfig::default(),
            splash: SplashConfig::default(),
            clock: ClockConfig::default(),
            log_level: LevelFilter::Info,
        }
    }
}

/// Parse configuration from string content. Missing keys keep their defaults.
pub fn parse_config_str(content: &str) -> QarmaConfig {
    let mut config = QarmaConfig::default();
    let mut current_section = String::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            current_section = String::from(&line[1..line.len() - 1]);
            continue;
        }

        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let value = line[eq_pos + 1..].trim();

            apply_config(&mut config, &current_section, key, value);
        }
    }

    config
}

fn apply_config(config: &mut QarmaConfig, section: &str, key: &str, value: &str) {
    match section {
        "general" | "qarma" => match key {
            "log_level" | "log" => {
                if let Ok(level) = LevelFilter::from_str(value) {
                    config.log_level = level;
                }
            }
            _ => {}
        },

        "display" => match key {
            "width" => {
                if let Some(w) = parse_u32(value) {
                    config.display.width = w.clamp(1, 8192);
                }
            }
            "height" => {
                if let Some(h) = parse_u32(value) {
                    config.display.height = h.clamp(1, 8192);
                }
            }
            "desktop" | "background" => {
                if let Some(c) = parse_color(value) {
                    config.display.desktop = Color::from_argb(c);
                }
            }
            _ => {}
        },

        "scheduler" => match key {
            "tick_rate" => {
                if let Some(r) = parse_u32(value) {
                    config.scheduler.tick_rate = r.clamp(1, 1000);
                }
            }
            "max_modules" | "modules" => {
                if let Some(n) = parse_u32(value) {
                    config.scheduler.max_modules = n.clamp(1, 256) as usize;
                }
            }
            "max_processes" | "processes" => {
                if let Some(n) = parse_u32(value) {
                    config.scheduler.max_processes = n.clamp(1, 256) as usize;
                }
            }
            _ => {}
        },

        "window" | "windows" => match key {
            "max_windows" | "capacity" => {
                if let Some(n) = parse_u32(value) {
                    config.windows.max_windows = n.clamp(1, 256) as usize;
                }
            }
            "default_x" | "x" => {
                if let Some(x) = parse_i32(value) {
                    config.windows.default_x = x;
                }
            }
            "default_y" | "y" => {
                if let Some(y) = parse_i32(value) {
                    config.windows.default_y = y;
                }
            }
            "default_width" | "width" => {
                if let Some(w) = parse_u32(value) {
                    config.windows.default_width = w.clamp(1, 8192);
                }
            }
            "default_height" | "height" => {
                if let Some(h) = parse_u32(value) {
                    config.windows.default_height = h.clamp(1, 8192);
                }
            }
            _ => {}
        },

        "splash" => match key {
            "enabled" | "show" => config.splash.enabled = parse_bool(value),
            "x" => {
                if let Some(x) = parse_i32(value) {
                    config.splash.x = x;
                }
            }
            "y" => {
                if let Some(y) = parse_i32(value) {
                    config.splash.y = y;
                }
            }
            "width" => {
                if let Some(w) = parse_u32(value) {
                    config.splash.width = w.clamp(1, 8192);
                }
            }
            "height" => {
                if let Some(h) = parse_u32(value) {
                    config.splash.height = h.clamp(1, 8192);
                }
            }
            "fade_speed" => {
                if let Some(s) = parse_f32(value) {
                    config.splash.fade_speed = s.clamp(0.0, 100.0);
                }
            }
            "background" => {
                if let Some(c) = parse_color(value) {
                    config.splash.background = Color::from_argb(c);
                }
            }
            "fallback" | "fallback_color" => {
                if let Some(c) = parse_color(value) {
                    config.splash.fallback = Color::from_argb(c);
                }
            }
            _ => {}
        },

        "clock" => match key {
            "enabled" | "show" => config.clock.enabled = parse_bool(value),
            "x" => {
                if let Some(x) = parse_i32(value) {
                    config.clock.x = x;
                }
            }
            "y" => {
                if let Some(y) = parse_i32(value) {
                    config.clock.y = y;
                }
            }
            "width" => {
                if let Some(w) = parse_u32(value) {
                    config.clock.width = w.clamp(1, 8192);
                }
            }
            "height" => {
                if let Some(h) = parse_u32(value) {
                    config.clock.height = h.clamp(1, 8192);
                }
            }
            "foreground" | "text" => {
                if let Some(c) = parse_color(value) {
                    config.clock.foreground = Color::from_argb(c);
                }
            }
            "background" => {
                if let Some(c) = parse_color(value) {
                    config.clock.background = Color::from_argb(c);
                }
            }
            "border" => {
                if let Some(c) = parse_color(value) {
                    config.clock.border = Color::from_argb(c);
                }
            }
            _ => {}
        },

        _ => {}
    }
}

/// Parse a color value (supports: 0xAARRGGBB, 0xRRGGBB, #AARRGGBB, #RRGGBB, #RGB, decimal)
pub fn parse_color(s: &str) -> Option<u32> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        let c = u32::from_str_radix(hex, 16).ok()?;
        return Some(if hex.len() <= 6 { 0xFF00_0000 | c } else { c });
    }

    if let Some(hex) = s.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        return match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(0xFF00_0000 | ((r as u32 * 17) << 16) | ((g as u32 * 17) << 8) | (b as u32 * 17))
            }
            6 => u32::from_str_radix(hex, 16).ok().map(|c| 0xFF00_0000 | c),
            8 => u32::from_str_radix(hex, 16).ok(),
            _ => None,
        };
    }

    s.parse::<u32>().ok()
}

pub fn parse_bool(s: &str) -> bool {
    matches!(s.trim(), "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "1" | "on" | "On" | "ON")
}

pub fn parse_u32(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

fn parse_i32(s: &str) -> Option<i32> {
    s.trim().parse().ok()
}

fn parse_f32(s: &str) -> Option<f32> {
    s.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG WRITER
// ═══════════════════════════════════════════════════════════════════════════════

/// Generate a configuration string that parses back to `config`
pub fn generate_config(config: &QarmaConfig) -> String {
    let mut out = String::new();

    out.push_str("# QARMA configuration\n\n");

    out.push_str("[general]\n");
    out.push_str(&format!("log_level = {}\n\n", config.log_level));

    out.push_str("[display]\n");
    out.push_str(&format!("width = {}\n", config.display.width));
    out.push_str(&format!("height = {}\n", config.display.height));
    out.push_str(&format!("desktop = 0x{:08X}\n\n", config.display.desktop.to_argb()));

    out.push_str("[scheduler]\n");
    out.push_str(&format!("tick_rate = {}\n", config.scheduler.tick_rate));
    out.push_str(&format!("max_modules = {}\n", config.scheduler.max_modules));
    out.push_str(&format!("max_processes = {}\n\n", config.scheduler.max_processes));

    out.push_str("[windows]\n");
    out.push_str(&format!("max_windows = {}\n", config.windows.max_windows));
    out.push_str(&format!("default_x = {}\n", config.windows.default_x));
    out.push_str(&format!("default_y = {}\n", config.windows.default_y));
    out.push_str(&format!("default_width = {}\n", config.windows.default_width));
    out.push_str(&format!("default_height = {}\n\n", config.windows.default_height));

    out.push_str("[splash]\n");
    out.push_str(&format!("enabled = {}\n", config.splash.enabled));
    out.push_str(&format!("x = {}\n", config.splash.x));
    out.push_str(&format!("y = {}\n", config.splash.y));
    out.push_str(&format!("width = {}\n", config.splash.width));
    out.push_str(&format!("height = {}\n", config.splash.height));
    out.push_str(&format!("fade_speed = {}\n", config.splash.fade_speed));
    out.push_str(&format!("background = 0x{:08X}\n", config.splash.background.to_argb()));
    out.push_str(&format!("fallback = 0x{:08X}\n\n", config.splash.fallback.to_argb()));

    out.push_str("[clock]\n");
    out.push_str(&format!("enabled = {}\n", config.clock.enabled));
    out.push_str(&format!("x = {}\n", config.clock.x));
    out.push_str(&format!("y = {}\n", config.clock.y));
    out.push_str(&format!("width = {}\n", config.clock.width));
    out.push_str(&format!("height = {}\n", config.clock.height));
    out.push_str(&format!("foreground = 0x{:08X}\n", config.clock.foreground.to_argb()));
    out.push_str(&format!("background = 0x{:08X}\n", config.clock.background.to_argb()));
    out.push_str(&format!("border = 0x{:08X}\n", config.clock.border.to_argb()));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("0xFF00FF"), Some(0xFFFF00FF));
        assert_eq!(parse_color("0x80000000"), Some(0x80000000));
        assert_eq!(parse_color("#FF0000"), Some(0xFFFF0000));
        assert_eq!(parse_color("#F00"), Some(0xFFFF0000));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("255"), Some(255));
        assert_eq!(parse_color("#\u{e9}1"), None);
    }

    #[test]
    fn non_ascii_color_keeps_default() {
        let c = parse_config_str("[display]\ndesktop = #\u{e9}1\n");
        assert_eq!(c.display.desktop, DisplayConfig::default().desktop);
    }

    #[test]
    fn defaults_match_stock_constants() {
        let c = QarmaConfig::default();
        assert_eq!((c.display.width, c.display.height), (800, 600));
        assert_eq!(c.scheduler.tick_rate, 60);
        assert_eq!(c.windows.max_windows, 64);
        assert_eq!((c.splash.x, c.splash.y, c.splash.width, c.splash.height), (30, 10, 640, 480));
        assert_eq!((c.clock.x, c.clock.y, c.clock.width, c.clock.height), (700, 10, 80, 20));
        assert_eq!(c.clock.background.a, 128);
    }

    #[test]
    fn parses_sections_and_clamps() {
        let text = "\
# comment
[display]
width = 1024
height = 99999

[scheduler]
tick_rate = 0
; another comment
[splash]
fade_speed = 0.5
fallback = #0F0

[general]
log_level = debug

[nonsense]
key = value
";
        let c = parse_config_str(text);
        assert_eq!(c.display.width, 1024);
        assert_eq!(c.display.height, 8192);
        assert_eq!(c.scheduler.tick_rate, 1);
        assert_eq!(c.splash.fade_speed, 0.5);
        assert_eq!(c.splash.fallback, Color::GREEN);
        assert_eq!(c.log_level, LevelFilter::Debug);
        assert_eq!(c.clock, ClockConfig::default());
    }

    #[test]
    fn generated_config_parses_back() {
        let mut c = QarmaConfig::default();
        c.display.width = 1280;
        c.splash.fade_speed = 0.25;
        c.clock.x = -4;
        c.clock.enabled = false;
        c.log_level = LevelFilter::Warn;
        assert_eq!(parse_config_str(&generate_config(&c)), c);
    }

    #[test]
    fn bools() {
        assert!(parse_bool("yes"));
        assert!(parse_bool(" ON "));
        assert!(!parse_bool("nope"));
    }
}

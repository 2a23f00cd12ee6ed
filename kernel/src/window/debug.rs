//! Debug console window
//!
//! A ring of the last [`CONSOLE_LINES`] messages. Pushing a line equal to
//! the newest one bumps its repeat counter instead of adding a copy.
//! Interactive consoles also echo typed characters into an input line
//! drawn below the messages.

use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;

use super::behavior::WindowBehavior;
use super::{WindowCore, WindowFlags};
use crate::gfx::{draw, Color, Font8x8, GLYPH_HEIGHT, GLYPH_WIDTH};

pub const CONSOLE_LINES: usize = 32;
/// Longer messages are truncated
pub const CONSOLE_LINE_LEN: usize = 127;

const LINE_HEIGHT: i32 = GLYPH_HEIGHT as i32;
const MARGIN_X: i32 = 4;
const MARGIN_Y: i32 = 2;
const PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub text: String,
    /// Extra identical pushes collapsed into this line
    pub repeats: u32,
}

pub struct DebugConsole {
    lines: VecDeque<ConsoleLine>,
    input: String,
    scroll: usize,
    pub foreground: Color,
    pub background: Color,
}

impl Default for DebugConsole {
    fn default() -> Self {
        Self::new()
    }
}

fn truncated(msg: &str) -> &str {
    match msg.char_indices().nth(CONSOLE_LINE_LEN) {
        Some((cut, _)) => &msg[..cut],
        None => msg,
    }
}

impl DebugConsole {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(CONSOLE_LINES),
            input: String::new(),
            scroll: 0,
            foreground: Color::WHITE,
            background: Color::rgb(0x11, 0x11, 0x11),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &ConsoleLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Append a message, collapsing a repeat of the newest line.
    /// Returns `false` when the message was collapsed.
    pub fn push(&mut self, msg: &str) -> bool {
        let msg = truncated(msg);
        if let Some(last) = self.lines.back_mut() {
            if last.text == msg {
                last.repeats = last.repeats.saturating_add(1);
                return false;
            }
        }
        if self.lines.len() == CONSOLE_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(ConsoleLine { text: String::from(msg), repeats: 0 });
        true
    }

    /// Message rows that fit in a window `height` pixels tall, one row
    /// reserved for input.
    pub fn visible_lines(height: u32) -> usize {
        ((height as i32 - MARGIN_Y) / LINE_HEIGHT - 1).max(1) as usize
    }

    fn max_scroll(&self, height: u32) -> usize {
        self.lines.len().saturating_sub(Self::visible_lines(height))
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize, height: u32) {
        self.scroll = (self.scroll + lines).min(self.max_scroll(height));
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_top(&mut self, height: u32) {
        self.scroll = self.max_scroll(height);
    }

    pub fn scroll_bottom(&mut self) {
        self.scroll = 0;
    }

    pub fn page_up(&mut self, height: u32) {
        self.scroll_up(Self::visible_lines(height), height);
    }

    pub fn page_down(&mut self, height: u32) {
        self.scroll_down(Self::visible_lines(height));
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Echo the input line into the log, clear it and return it.
    pub fn submit(&mut self) -> String {
        let line = core::mem::take(&mut self.input);
        self.push(&line);
        self.scroll = 0;
        line
    }
}

impl WindowBehavior for DebugConsole {
    fn render(&mut self, core: &mut WindowCore) {
        let height = core.height();
        let rows = Self::visible_lines(height);
        let shown = self.lines.len().min(rows);
        self.scroll = self.scroll.min(self.max_scroll(height));
        let start = self.lines.len() - shown - self.scroll;
        let fg = self.foreground.to_argb();
        let interactive = core.flags.contains(WindowFlags::INTERACTIVE);

        let surface = core.surface_mut();
        surface.fill(self.background.to_argb());

        let mut y = MARGIN_Y;
        for line in self.lines.iter().skip(start).take(shown) {
            if line.repeats > 0 {
                let text = format!("{} (x{})", line.text, line.repeats + 1);
                draw::draw_text(surface, &Font8x8, MARGIN_X, y, &text, fg);
            } else {
                draw::draw_text(surface, &Font8x8, MARGIN_X, y, &line.text, fg);
            }
            y += LINE_HEIGHT;
        }

        if interactive {
            draw::draw_text(surface, &Font8x8, MARGIN_X, y, PROMPT, fg);
            let input_x = MARGIN_X + (PROMPT.len() as u32 * GLYPH_WIDTH) as i32;
            draw::draw_text(surface, &Font8x8, input_x, y, &self.input, fg);
            let cursor_x = input_x + (self.input.chars().count() as u32 * GLYPH_WIDTH) as i32;
            draw::draw_char(surface, &Font8x8, cursor_x, y, '_', fg);
        }
    }

    fn on_char(&mut self, core: &mut WindowCore, ch: char) {
        if self.input.chars().count() < CONSOLE_LINE_LEN {
            self.input.push(ch);
            core.dirty = true;
        }
    }
}

//! Demo layers: a system list and a details dialog.
//!
//! Layers never touch the window directly. Opening and closing dialogs goes
//! through a captured [`WindowHandle`] and runs on the next update.

use marquee_core::backend::{Color, Renderer};
use marquee_core::error::Result;
use marquee_core::help::HelpPrompt;
use marquee_core::input::{Action, InputConfig, InputEvent};
use marquee_core::{GuiLayer, LayerKind, WindowHandle};

const BACKGROUND: Color = Color::rgb(18, 22, 34);
const ROW: Color = Color::rgb(36, 42, 60);
const SELECTED: Color = Color::rgb(70, 110, 190);
const HEADER_LEFT: Color = Color::rgb(90, 40, 120);
const HEADER_RIGHT: Color = Color::rgb(30, 90, 140);

const FONT: u16 = 16;

/// Scrollable list of systems. Confirm opens a details dialog.
pub struct SystemList {
    systems: Vec<String>,
    cursor: usize,
    opacity: u8,
    handle: WindowHandle,
}

impl SystemList {
    pub fn new(systems: &[&str], handle: WindowHandle) -> Self {
        Self {
            systems: systems.iter().map(|s| s.to_string()).collect(),
            cursor: 0,
            opacity: 255,
            handle,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.systems.get(self.cursor).map(String::as_str)
    }

    fn move_cursor(&mut self, forward: bool) {
        let n = self.systems.len();
        if n == 0 {
            return;
        }
        self.cursor = if forward {
            (self.cursor + 1) % n
        } else {
            (self.cursor + n - 1) % n
        };
    }

    fn open_details(&self) {
        let Some(name) = self.selected() else {
            return;
        };
        let name = name.to_string();
        let handle = self.handle.clone();
        self.handle.post_to_ui_thread(move |w| {
            log::debug!("Opening details for {name}");
            w.push(Box::new(GameDetails::new(name, handle)));
        });
    }
}

impl GuiLayer for SystemList {
    fn input(&mut self, config: &dyn InputConfig, event: &InputEvent) -> bool {
        if !event.is_press() {
            return false;
        }
        if config.is_mapped_to(Action::Down, event) {
            self.move_cursor(true);
        } else if config.is_mapped_to(Action::Up, event) {
            self.move_cursor(false);
        } else if config.is_mapped_to(Action::A, event) {
            self.open_details();
        } else {
            return false;
        }
        true
    }

    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let (sw, sh) = renderer.screen_size();
        let fade = |c: Color| c.faded(self.opacity);
        renderer.fill_rect(0, 0, sw, sh, fade(BACKGROUND))?;

        let header_h = sh / 8;
        renderer.fill_rect_gradient_h(
            0,
            0,
            sw,
            header_h,
            fade(HEADER_LEFT),
            fade(HEADER_RIGHT),
        )?;
        let title_y = header_h.saturating_sub(renderer.measure_text_height(FONT)) as i32 / 2;
        renderer.draw_text("SYSTEMS", 16, title_y, FONT, fade(Color::WHITE))?;

        let row_h = renderer.measure_text_height(FONT) * 2;
        let margin = (sw / 16) as i32;
        for (i, name) in self.systems.iter().enumerate() {
            let y = (header_h + row_h / 2) as i32 + i as i32 * (row_h + 4) as i32;
            let color = if i == self.cursor { SELECTED } else { ROW };
            renderer.fill_rounded_rect(
                margin,
                y,
                sw - 2 * margin as u32,
                row_h,
                (row_h / 4) as u16,
                fade(color),
            )?;
            let text_y = y + (row_h / 4) as i32;
            renderer.draw_text(name, margin + 12, text_y, FONT, fade(Color::WHITE))?;
        }
        Ok(())
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![
            HelpPrompt::new("up/down", "choose"),
            HelpPrompt::new("a", "details"),
        ]
    }

    fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }
}

/// Modal dialog over the list. Cancel closes it.
pub struct GameDetails {
    title: String,
    handle: WindowHandle,
}

impl GameDetails {
    pub fn new(title: impl Into<String>, handle: WindowHandle) -> Self {
        Self {
            title: title.into(),
            handle,
        }
    }
}

impl GuiLayer for GameDetails {
    fn kind(&self) -> LayerKind {
        LayerKind::MessageBox
    }

    fn input(&mut self, config: &dyn InputConfig, event: &InputEvent) -> bool {
        if event.is_press() && config.is_mapped_to(Action::B, event) {
            self.handle.post_to_ui_thread(|w| {
                if let Some(top) = w.peek() {
                    w.remove(top);
                }
            });
        }
        // Modal: swallow everything.
        true
    }

    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let (sw, sh) = renderer.screen_size();
        let (w, h) = (sw / 2, sh / 3);
        let (x, y) = (((sw - w) / 2) as i32, ((sh - h) / 2) as i32);
        renderer.fill_rounded_rect(x, y, w, h, 12, Color::rgba(30, 30, 40, 240))?;

        let line_h = renderer.measure_text_height(FONT) as i32;
        let tw = renderer.measure_text(&self.title, FONT) as i32;
        renderer.draw_text(
            &self.title,
            x + (w as i32 - tw) / 2,
            y + line_h,
            FONT,
            Color::WHITE,
        )?;

        let hint = "Press B to close";
        let hw = renderer.measure_text(hint, 8) as i32;
        renderer.draw_text(
            hint,
            x + (w as i32 - hw) / 2,
            y + h as i32 - line_h * 2,
            8,
            Color::rgb(170, 170, 170),
        )
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![HelpPrompt::new("b", "back")]
    }
}

//! Progress indicator for long background jobs.

use std::sync::{Mutex, PoisonError};

use crate::backend::{Color, Renderer};
use crate::error::Result;
use crate::services::NotificationWidget;

use super::FONT_SMALL;

#[derive(Debug, Clone)]
struct ProgressState {
    title: String,
    percent: u8,
}

/// A persistent notification widget showing a title and a progress bar.
///
/// Wrap it in an `Arc`, register it through a
/// [`WindowHandle`](crate::window::WindowHandle), and update it from the
/// worker thread.
#[derive(Debug)]
pub struct ProgressNotification {
    state: Mutex<ProgressState>,
}

impl ProgressNotification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                title: title.into(),
                percent: 0,
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state().title = title.into();
    }

    /// Set completion, clamped to 100.
    pub fn set_percent(&self, percent: u8) {
        self.state().percent = percent.min(100);
    }

    pub fn percent(&self) -> u8 {
        self.state().percent
    }

    pub fn title(&self) -> String {
        self.state().title.clone()
    }
}

impl NotificationWidget for ProgressNotification {
    fn size(&self, renderer: &dyn Renderer) -> (u32, u32) {
        let title = self.title();
        let line_h = renderer.measure_text_height(FONT_SMALL);
        let min_w = renderer.screen_width() / 4;
        let w = (renderer.measure_text(&title, FONT_SMALL) + line_h * 2).max(min_w);
        (w, line_h * 3)
    }

    fn render(&self, renderer: &mut dyn Renderer, x: i32, y: i32) -> Result<()> {
        let (w, h) = self.size(renderer);
        let ProgressState { title, percent } = self.state().clone();
        let line_h = renderer.measure_text_height(FONT_SMALL);
        let pad = line_h as i32;

        let radius = (line_h / 2) as u16;
        renderer.fill_rounded_rect(x, y, w, h, radius, Color::rgba(20, 20, 20, 220))?;
        renderer.draw_text(&title, x + pad, y + pad / 2, FONT_SMALL, Color::WHITE)?;

        let bar_w = w.saturating_sub(line_h * 2);
        let bar_y = y + pad * 2 - pad / 4;
        renderer.fill_rect(x + pad, bar_y, bar_w, line_h / 2, Color::rgb(80, 80, 80))?;
        let fill = bar_w * percent as u32 / 100;
        renderer.fill_rect(x + pad, bar_y, fill, line_h / 2, Color::from_rgba_u32(0xDF1010FF))
    }
}

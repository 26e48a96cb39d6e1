//! Transient notification popup.

use crate::backend::{Color, Renderer};
use crate::error::Result;

use super::{FONT_MEDIUM, fade_alpha};

const FADE_MS: u32 = 250;

/// A message shown at the top of the screen for a fixed time, fading in and
/// out at either end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPopup {
    message: String,
    duration_ms: u32,
    elapsed_ms: u32,
}

impl InfoPopup {
    pub fn new(message: impl Into<String>, duration_ms: u32) -> Self {
        Self {
            message: message.into(),
            duration_ms,
            elapsed_ms: 0,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn update(&mut self, dt: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt);
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        if self.is_expired() {
            return Ok(());
        }
        let alpha = fade_alpha(self.elapsed_ms, self.duration_ms, FADE_MS);
        let (sw, sh) = renderer.screen_size();
        let text_w = renderer.measure_text(&self.message, FONT_MEDIUM);
        let line_h = renderer.measure_text_height(FONT_MEDIUM);
        let pad = line_h / 2;
        let w = (text_w + pad * 2).min(sw);
        let h = line_h + pad * 2;
        let x = (sw.saturating_sub(w) / 2) as i32;
        let y = (sh as f32 * 0.02) as i32;

        let background = Color::rgba(20, 20, 20, 220).faded(alpha);
        renderer.fill_rounded_rect(x, y, w, h, pad as u16, background)?;
        renderer.draw_text(
            &self.message,
            x + pad as i32,
            y + pad as i32,
            FONT_MEDIUM,
            Color::WHITE.faded(alpha),
        )
    }
}

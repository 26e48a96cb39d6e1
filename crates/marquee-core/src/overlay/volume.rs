//! Volume popup shown briefly after the master volume changes.

use crate::backend::{Color, Renderer};
use crate::error::Result;

use super::FONT_SMALL;

/// How long the popup stays after the last change.
const VISIBLE_MS: u32 = 2000;
const FADE_MS: u32 = 250;

#[derive(Debug, Clone, Default)]
pub struct VolumeInfo {
    last_volume: Option<u8>,
    remaining_ms: u32,
}

impl VolumeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last seen volume and hide the popup.
    pub fn reset(&mut self) {
        self.last_volume = None;
        self.remaining_ms = 0;
    }

    pub fn is_visible(&self) -> bool {
        self.remaining_ms > 0
    }

    /// Feed the current volume. The first reading only primes the state.
    pub fn update(&mut self, dt: u32, volume: u8) {
        self.remaining_ms = self.remaining_ms.saturating_sub(dt);
        if self.last_volume.is_some_and(|v| v != volume) {
            self.remaining_ms = VISIBLE_MS;
        }
        self.last_volume = Some(volume);
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }
        let Some(volume) = self.last_volume else {
            return Ok(());
        };
        let alpha = (self.remaining_ms.min(FADE_MS) * 255 / FADE_MS) as u8;
        let (sw, sh) = renderer.screen_size();
        let w = sw / 4;
        let line_h = renderer.measure_text_height(FONT_SMALL);
        let h = line_h * 3;
        let x = ((sw - w) / 2) as i32;
        let y = (sh as f32 * 0.05) as i32;

        let pad = line_h as i32;
        renderer.fill_rounded_rect(
            x,
            y,
            w,
            h,
            (line_h / 2) as u16,
            Color::rgba(0, 0, 0, 180).faded(alpha),
        )?;
        let label = format!("VOLUME {volume}%");
        let text_color = Color::WHITE.faded(alpha);
        renderer.draw_text(&label, x + pad, y + pad / 2, FONT_SMALL, text_color)?;

        let bar_w = w.saturating_sub(line_h * 2);
        let fill = bar_w * volume as u32 / 100;
        let bar_y = y + pad * 2 - pad / 4;
        let track = Color::rgb(80, 80, 80).faded(alpha);
        renderer.fill_rect(x + pad, bar_y, bar_w, line_h / 2, track)?;
        renderer.fill_rect(x + pad, bar_y, fill, line_h / 2, text_color)
    }
}

//! Frame timing statistics and the debug framerate readout.

use crate::backend::{Color, Renderer, VramUsage};
use crate::error::Result;

use super::FONT_MEDIUM;

/// Length of the averaging window.
const WINDOW_MS: u32 = 500;
const TEXT_COLOR: Color = Color::from_rgba_u32(0xFF00FFFF);

/// Rolling frame-time average plus the one-shot delta normalization.
#[derive(Debug, Clone)]
pub struct FrameStats {
    elapsed_ms: u32,
    frames: u32,
    average_dt: u32,
    normalize_next: bool,
    text: Option<String>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0,
            frames: 0,
            average_dt: 10,
            normalize_next: false,
            text: None,
        }
    }

    /// Average frame time over the last completed window.
    pub fn average_dt(&self) -> u32 {
        self.average_dt
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Cap the next delta to the running average.
    pub fn normalize_next_update(&mut self) {
        self.normalize_next = true;
    }

    /// Apply a pending normalization to `dt`. Clears the flag.
    pub fn normalize(&mut self, dt: u32) -> u32 {
        if !std::mem::take(&mut self.normalize_next) {
            return dt;
        }
        dt.min(self.average_dt)
    }

    /// Account one frame. When the window rolls over the average is
    /// recomputed and, if `draw_text` is set, the readout rebuilt.
    pub fn record(&mut self, dt: u32, draw_text: bool, vram: VramUsage) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt);
        self.frames += 1;
        if self.elapsed_ms <= WINDOW_MS {
            return;
        }
        self.average_dt = self.elapsed_ms / self.frames;
        if draw_text {
            self.text = Some(format_stats(self.elapsed_ms, self.frames, vram));
        }
        self.elapsed_ms = 0;
        self.frames = 0;
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        let Some(text) = &self.text else {
            return Ok(());
        };
        let line_h = renderer.measure_text_height(FONT_MEDIUM) as i32;
        for (i, line) in text.lines().enumerate() {
            renderer.draw_text(line, 50, 50 + i as i32 * line_h, FONT_MEDIUM, TEXT_COLOR)?;
        }
        Ok(())
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

fn megabytes(bytes: u64) -> f32 {
    bytes as f32 / 1000.0 / 1000.0
}

fn format_stats(elapsed_ms: u32, frames: u32, vram: VramUsage) -> String {
    let fps = 1000.0 * frames as f32 / elapsed_ms as f32;
    let ms = elapsed_ms as f32 / frames as f32;
    format!(
        "{fps:.1}fps, {ms:.2}ms\nFont VRAM: {:.2} Tex VRAM: {:.2} Tex Max: {:.2}",
        megabytes(vram.font_bytes),
        megabytes(vram.texture_bytes),
        megabytes(vram.texture_max_bytes),
    )
}

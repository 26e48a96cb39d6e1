//! Loading screen with a progress bar.

use crate::backend::{Color, Renderer};
use crate::error::Result;

use super::FONT_MEDIUM;

/// Bar height as a fraction of the screen height.
const BAR_HEIGHT: f32 = 0.036;

/// Full-screen loading splash. Drawn and presented synchronously, outside
/// the normal frame loop.
#[derive(Debug, Clone, Default)]
pub struct Splash {
    title: String,
}

impl Splash {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Draw one splash frame and swap buffers.
    ///
    /// `percent` in `0.0..=1.0` draws the bar; `None` omits it. Nothing is
    /// drawn at zero opacity.
    pub fn render(
        &self,
        renderer: &mut dyn Renderer,
        text: &str,
        percent: Option<f32>,
        opacity: u8,
    ) -> Result<()> {
        if opacity == 0 {
            return Ok(());
        }
        let (sw, sh) = renderer.screen_size();
        let (swf, shf) = (sw as f32, sh as f32);
        renderer.fill_rect(0, 0, sw, sh, Color::BLACK)?;

        if !self.title.is_empty() {
            let w = renderer.measure_text(&self.title, FONT_MEDIUM * 2);
            let x = (sw.saturating_sub(w) / 2) as i32;
            let y = (shf * 0.4) as i32;
            let color = Color::WHITE.with_alpha(opacity);
            renderer.draw_text(&self.title, x, y, FONT_MEDIUM * 2, color)?;
        }

        if let Some(percent) = percent {
            let w = swf / 2.0;
            let h = shf * BAR_HEIGHT;
            let x = (swf / 2.0 - w / 2.0) as i32;
            let y = (shf - shf * 3.0 * BAR_HEIGHT) as i32;
            let corner = shf / 105.0;
            let rounded = corner > 1.0;

            if rounded {
                renderer.push_rounded_clip(x, y, w as u32, h as u32, corner as u16)?;
            }
            let track = Color::rgb(0x90, 0x90, 0x90).with_alpha(opacity / 2);
            renderer.fill_rect(x, y, w as u32, h as u32, track)?;
            renderer.fill_rect_gradient_h(
                x,
                y,
                (w * percent.clamp(0.0, 1.0)) as u32,
                h as u32,
                Color::rgb(0xDF, 0x10, 0x10).with_alpha(opacity),
                Color::rgb(0x4F, 0x00, 0x00).with_alpha(opacity),
            )?;
            if rounded {
                renderer.pop_clip()?;
            }
        }

        if !text.is_empty() {
            let w = renderer.measure_text(text, FONT_MEDIUM);
            let x = (sw.saturating_sub(w) / 2) as i32;
            let y = (shf * 0.78) as i32;
            renderer.draw_text(text, x, y, FONT_MEDIUM, Color::WHITE.with_alpha(opacity))?;
        }

        renderer.swap_buffers()
    }
}

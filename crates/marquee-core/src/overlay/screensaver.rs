//! Built-in screensaver: fade the screen to a dim or black veil.

use crate::backend::Renderer;
use crate::config::ScreenSaverBehavior;
use crate::error::Result;
use crate::services::ScreenSaver;

const FADE_IN_MS: u32 = 1000;
const FADE_OUT_MS: u32 = 250;

#[derive(Debug, Clone)]
pub struct DimScreenSaver {
    active: bool,
    max_alpha: u8,
    alpha: u8,
}

impl DimScreenSaver {
    /// Partial dim.
    pub fn dim() -> Self {
        Self::with_max_alpha(200)
    }

    /// Fully black.
    pub fn black() -> Self {
        Self::with_max_alpha(255)
    }

    /// Pick the veil for a configured behavior. Content-showing behaviors
    /// need an external engine; they fall back to the dim veil.
    pub fn for_behavior(behavior: ScreenSaverBehavior) -> Self {
        match behavior {
            ScreenSaverBehavior::Black => Self::black(),
            _ => Self::dim(),
        }
    }

    fn with_max_alpha(max_alpha: u8) -> Self {
        Self {
            active: false,
            max_alpha,
            alpha: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }
}

fn step(dt: u32, span_ms: u32, max: u8) -> u8 {
    (dt.saturating_mul(max as u32) / span_ms).clamp(1, 255) as u8
}

impl ScreenSaver for DimScreenSaver {
    fn start(&mut self) {
        log::debug!("Screensaver veil fading in");
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn update(&mut self, dt: u32) {
        if self.active {
            let s = step(dt, FADE_IN_MS, self.max_alpha);
            self.alpha = self.alpha.saturating_add(s).min(self.max_alpha);
        } else if self.alpha > 0 {
            self.alpha = self.alpha.saturating_sub(step(dt, FADE_OUT_MS, self.max_alpha));
        }
    }

    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        if self.alpha == 0 {
            return Ok(());
        }
        renderer.dim_screen(self.alpha)
    }

    /// Sleep only once the veil is fully down.
    fn allow_sleep(&self) -> bool {
        self.active && self.alpha >= self.max_alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockRenderer;

    #[test]
    fn fades_in_then_allows_sleep() {
        let mut ss = DimScreenSaver::dim();
        ss.start();
        ss.update(500);
        assert_eq!(ss.alpha(), 100);
        assert!(!ss.allow_sleep());
        ss.update(500);
        assert_eq!(ss.alpha(), 200);
        assert!(ss.allow_sleep());
        ss.update(500);
        assert_eq!(ss.alpha(), 200);
    }

    #[test]
    fn fades_out_after_stop() {
        let mut ss = DimScreenSaver::black();
        ss.start();
        ss.update(1000);
        assert_eq!(ss.alpha(), 255);
        ss.stop();
        assert!(!ss.allow_sleep());
        ss.update(125);
        assert_eq!(ss.alpha(), 128);
        ss.update(250);
        assert_eq!(ss.alpha(), 0);

        let mut r = MockRenderer::new(640, 480);
        ss.render(&mut r).unwrap();
        assert!(r.calls.is_empty());
    }

    #[test]
    fn renders_while_fading() {
        let mut ss = DimScreenSaver::dim();
        ss.start();
        ss.update(100);
        let mut r = MockRenderer::new(640, 480);
        ss.render(&mut r).unwrap();
        assert_eq!(r.fill_rect_count(), 1);
    }

    #[test]
    fn behavior_selection() {
        assert_eq!(
            DimScreenSaver::for_behavior(ScreenSaverBehavior::Black).max_alpha,
            255
        );
        assert_eq!(
            DimScreenSaver::for_behavior(ScreenSaverBehavior::Slideshow).max_alpha,
            200
        );
    }
}

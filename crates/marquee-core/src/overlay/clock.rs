//! Bottom-right `HH:MM` clock.

use crate::backend::{Color, Renderer};
use crate::error::Result;
use crate::platform::TimeService;
use crate::theme::DEFAULT_CLOCK_COLOR;

use super::FONT_SMALL;

/// Milliseconds between clock refreshes.
const REFRESH_MS: i32 = 1000;

/// Clock overlay.
///
/// The text is only replaced when the system clock looks set; boards without
/// an RTC keep showing nothing (or the last good value) instead of 1970.
#[derive(Debug, Clone)]
pub struct ClockOverlay {
    text: Option<String>,
    countdown: i32,
    color: Color,
    font_size: u16,
}

impl ClockOverlay {
    pub fn new() -> Self {
        Self {
            text: None,
            countdown: 0,
            color: DEFAULT_CLOCK_COLOR,
            font_size: FONT_SMALL,
        }
    }

    pub fn set_style(&mut self, color: Color, font_size: u16) {
        self.color = color;
        self.font_size = font_size;
    }

    /// Refresh on the next update regardless of the countdown.
    pub fn force_refresh(&mut self) {
        self.countdown = -1;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn update(&mut self, dt: u32, time: &dyn TimeService) {
        let step = i32::try_from(dt).unwrap_or(i32::MAX);
        self.countdown = self.countdown.saturating_sub(step);
        if self.countdown > 0 {
            return;
        }
        match time.now() {
            Ok(now) if now.is_plausible() => self.text = Some(now.hour_minute()),
            Ok(now) => log::debug!("Clock not set ({now}), skipping refresh"),
            Err(e) => log::debug!("Clock unavailable: {e}"),
        }
        self.countdown = REFRESH_MS;
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        let Some(text) = &self.text else {
            return Ok(());
        };
        let (sw, sh) = renderer.screen_size();
        let w = renderer.measure_text(text, self.font_size) as i32;
        let h = renderer.measure_text_height(self.font_size) as i32;
        let x = (sw as f32 * 0.99) as i32 - w;
        let y = (sh as f32 * 0.9965) as i32 - h;
        renderer.draw_text(text, x, y, self.font_size, self.color)
    }
}

impl Default for ClockOverlay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::MarqueeError;
    use crate::platform::SystemTime;
    use crate::test_utils::MockRenderer;

    struct FakeClock {
        year: u16,
        minute: Cell<u8>,
        calls: Cell<u32>,
    }

    impl FakeClock {
        fn new(year: u16) -> Self {
            Self {
                year,
                minute: Cell::new(5),
                calls: Cell::new(0),
            }
        }
    }

    impl TimeService for FakeClock {
        fn now(&self) -> Result<SystemTime> {
            self.calls.set(self.calls.get() + 1);
            Ok(SystemTime {
                year: self.year,
                month: 6,
                day: 1,
                hour: 9,
                minute: self.minute.get(),
                second: 0,
            })
        }
    }

    struct BrokenClock;

    impl TimeService for BrokenClock {
        fn now(&self) -> Result<SystemTime> {
            Err(MarqueeError::Backend("no rtc".into()))
        }
    }

    #[test]
    fn first_update_sets_text() {
        let mut clock = ClockOverlay::new();
        let time = FakeClock::new(2026);
        clock.update(16, &time);
        assert_eq!(clock.text(), Some("09:05"));
    }

    #[test]
    fn refreshes_once_per_second() {
        let mut clock = ClockOverlay::new();
        let time = FakeClock::new(2026);
        clock.update(16, &time);
        for _ in 0..10 {
            clock.update(16, &time);
        }
        assert_eq!(time.calls.get(), 1);
        clock.update(1000, &time);
        assert_eq!(time.calls.get(), 2);
    }

    #[test]
    fn huge_delta_still_refreshes() {
        let mut clock = ClockOverlay::new();
        let time = FakeClock::new(2026);
        clock.update(16, &time);
        time.minute.set(6);
        clock.update(3_000_000_000, &time);
        assert_eq!(clock.text(), Some("09:06"));
        assert_eq!(time.calls.get(), 2);

        // Back on the normal one-second cadence afterwards.
        for _ in 0..10 {
            clock.update(16, &time);
        }
        assert_eq!(time.calls.get(), 2);
        time.minute.set(7);
        clock.update(u32::MAX, &time);
        assert_eq!(clock.text(), Some("09:07"));
    }

    #[test]
    fn force_refresh_runs_on_zero_delta() {
        let mut clock = ClockOverlay::new();
        let time = FakeClock::new(2026);
        clock.update(16, &time);
        time.minute.set(6);
        clock.force_refresh();
        clock.update(0, &time);
        assert_eq!(clock.text(), Some("09:06"));
    }

    #[test]
    fn implausible_year_keeps_previous_text() {
        let mut clock = ClockOverlay::new();
        clock.update(16, &FakeClock::new(1970));
        assert_eq!(clock.text(), None);

        clock.update(1000, &FakeClock::new(2026));
        assert_eq!(clock.text(), Some("09:05"));
        clock.update(1000, &FakeClock::new(2000));
        assert_eq!(clock.text(), Some("09:05"));
    }

    #[test]
    fn clock_errors_are_ignored() {
        let mut clock = ClockOverlay::new();
        clock.update(16, &BrokenClock);
        assert_eq!(clock.text(), None);
    }

    #[test]
    fn renders_right_aligned_near_bottom() {
        let mut clock = ClockOverlay::new();
        clock.update(16, &FakeClock::new(2026));
        let mut r = MockRenderer::new(640, 480);
        clock.render(&mut r).unwrap();
        let (x, y) = r.text_position("09:05").unwrap();
        // 5 glyphs * 8 px ends at 0.99 * 640.
        assert_eq!(x, 633 - 40);
        assert_eq!(y, 478 - 8);
    }
}

//! Battery level indicator (top-left).

use crate::backend::{Color, Renderer};
use crate::error::Result;
use crate::platform::{BatteryState, PowerInfo, PowerService};
use crate::theme::IndicatorTheme;

use super::FONT_SMALL;

/// Milliseconds between power queries.
const POLL_MS: u32 = 2000;

/// Battery indicator. Hidden on machines without a battery.
#[derive(Debug, Clone)]
pub struct BatteryIndicator {
    text: Option<String>,
    since_poll: Option<u32>,
    color: Color,
    font_size: u16,
}

impl BatteryIndicator {
    pub fn new() -> Self {
        Self {
            text: None,
            since_poll: None,
            color: Color::from_rgba_u32(0x777777FF),
            font_size: FONT_SMALL,
        }
    }

    pub fn apply_theme(&mut self, theme: Option<&IndicatorTheme>) {
        let defaults = Self::new();
        self.color = theme.and_then(|t| t.color).unwrap_or(defaults.color);
        self.font_size = theme.and_then(|t| t.font_size).unwrap_or(defaults.font_size);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Poll the power service on the first call and every two seconds.
    pub fn update(&mut self, dt: u32, power: &dyn PowerService) {
        let due = match self.since_poll {
            None => true,
            Some(elapsed) => elapsed.saturating_add(dt) >= POLL_MS,
        };
        if !due {
            self.since_poll = self.since_poll.map(|e| e.saturating_add(dt));
            return;
        }
        self.since_poll = Some(0);
        match power.power_info() {
            Ok(info) => self.text = battery_text(&info),
            Err(e) => log::debug!("Power info unavailable: {e}"),
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        let Some(text) = &self.text else {
            return Ok(());
        };
        let (sw, sh) = renderer.screen_size();
        let x = (sw as f32 * 0.01) as i32;
        let y = (sh as f32 * 0.01) as i32;
        renderer.draw_text(text, x, y, self.font_size, self.color)
    }
}

impl Default for BatteryIndicator {
    fn default() -> Self {
        Self::new()
    }
}

fn battery_text(info: &PowerInfo) -> Option<String> {
    let pct = info.battery_percent.unwrap_or(0);
    match info.state {
        BatteryState::NoBattery => None,
        BatteryState::Full => Some("FULL".to_string()),
        BatteryState::Charging => Some(format!("{pct}% CHG")),
        BatteryState::Discharging => {
            let icon = match pct {
                0..=20 => "[|    ]",
                21..=40 => "[||   ]",
                41..=60 => "[|||  ]",
                61..=80 => "[|||| ]",
                _ => "[|||||]",
            };
            Some(format!("{pct}% {icon}"))
        },
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::test_utils::MockRenderer;

    struct FakePower {
        info: Cell<PowerInfo>,
        polls: Cell<u32>,
    }

    impl FakePower {
        fn new(percent: u8, state: BatteryState) -> Self {
            Self {
                info: Cell::new(PowerInfo {
                    battery_percent: Some(percent),
                    state,
                }),
                polls: Cell::new(0),
            }
        }
    }

    impl PowerService for FakePower {
        fn power_info(&self) -> Result<PowerInfo> {
            self.polls.set(self.polls.get() + 1);
            Ok(self.info.get())
        }
    }

    #[test]
    fn discharging_text() {
        let mut ind = BatteryIndicator::new();
        ind.update(16, &FakePower::new(75, BatteryState::Discharging));
        assert_eq!(ind.text(), Some("75% [|||| ]"));
    }

    #[test]
    fn charging_and_full_text() {
        let mut ind = BatteryIndicator::new();
        ind.update(16, &FakePower::new(40, BatteryState::Charging));
        assert_eq!(ind.text(), Some("40% CHG"));

        let mut ind = BatteryIndicator::new();
        ind.update(16, &FakePower::new(100, BatteryState::Full));
        assert_eq!(ind.text(), Some("FULL"));
    }

    #[test]
    fn no_battery_hides_indicator() {
        let mut ind = BatteryIndicator::new();
        let power = FakePower::new(0, BatteryState::NoBattery);
        power.info.set(PowerInfo::NO_BATTERY);
        ind.update(16, &power);
        assert_eq!(ind.text(), None);
        let mut r = MockRenderer::new(640, 480);
        ind.render(&mut r).unwrap();
        assert!(r.calls.is_empty());
    }

    #[test]
    fn polls_every_two_seconds() {
        let mut ind = BatteryIndicator::new();
        let power = FakePower::new(50, BatteryState::Discharging);
        ind.update(16, &power);
        for _ in 0..100 {
            ind.update(16, &power);
        }
        assert_eq!(power.polls.get(), 1);
        for _ in 0..30 {
            ind.update(16, &power);
        }
        assert_eq!(power.polls.get(), 2);
    }

    #[test]
    fn renders_text() {
        let mut ind = BatteryIndicator::new();
        ind.update(16, &FakePower::new(10, BatteryState::Discharging));
        let mut r = MockRenderer::new(640, 480);
        ind.render(&mut r).unwrap();
        assert!(r.has_text("10%"));
    }
}

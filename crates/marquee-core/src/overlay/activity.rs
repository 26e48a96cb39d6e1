//! Controller activity indicator.
//!
//! One small square per input device seen so far, flashed for a moment on
//! every press. Purely visual: it never consumes input.

use crate::backend::{Color, Renderer};
use crate::error::Result;
use crate::input::{DeviceId, InputConfig, InputEvent};
use crate::theme::IndicatorTheme;

use super::FONT_SMALL;

/// How long a device square stays highlighted after a press.
const FLASH_MS: u32 = 250;

#[derive(Debug, Clone, Copy)]
struct DeviceSlot {
    device: DeviceId,
    flash_ms: u32,
}

#[derive(Debug, Clone)]
pub struct ControllerActivity {
    slots: Vec<DeviceSlot>,
    color: Color,
    active_color: Color,
    font_size: u16,
}

impl ControllerActivity {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            color: Color::from_rgba_u32(0x777777FF),
            active_color: Color::from_rgba_u32(0x6BBA4FFF),
            font_size: FONT_SMALL,
        }
    }

    pub fn apply_theme(&mut self, theme: Option<&IndicatorTheme>) {
        let defaults = Self::new();
        self.color = theme.and_then(|t| t.color).unwrap_or(defaults.color);
        self.active_color = theme
            .and_then(|t| t.active_color)
            .unwrap_or(defaults.active_color);
        self.font_size = theme.and_then(|t| t.font_size).unwrap_or(defaults.font_size);
    }

    pub fn input(&mut self, config: &dyn InputConfig, event: &InputEvent) {
        let device = config.device_id();
        let idx = match self.slots.iter().position(|s| s.device == device) {
            Some(idx) => idx,
            None => {
                self.slots.push(DeviceSlot {
                    device,
                    flash_ms: 0,
                });
                self.slots.len() - 1
            },
        };
        if event.is_press() {
            self.slots[idx].flash_ms = FLASH_MS;
        }
    }

    pub fn update(&mut self, dt: u32) {
        for slot in &mut self.slots {
            slot.flash_ms = slot.flash_ms.saturating_sub(dt);
        }
    }

    /// Whether `device` is currently highlighted.
    pub fn is_flashing(&self, device: DeviceId) -> bool {
        self.slots
            .iter()
            .any(|s| s.device == device && s.flash_ms > 0)
    }

    pub fn device_count(&self) -> usize {
        self.slots.len()
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        if self.slots.is_empty() {
            return Ok(());
        }
        let (sw, sh) = renderer.screen_size();
        let size = renderer.measure_text_height(self.font_size);
        let gap = (size / 2).max(1) as i32;
        let y = (sh as f32 * 0.9965) as i32 - size as i32 * 3;
        let mut x = (sw as f32 * 0.99) as i32;
        for slot in self.slots.iter().rev() {
            x -= size as i32;
            let color = if slot.flash_ms > 0 {
                self.active_color
            } else {
                self.color.with_alpha(110)
            };
            renderer.fill_rounded_rect(x, y, size, size, (size / 4) as u16, color)?;
            x -= gap;
        }
        Ok(())
    }
}

impl Default for ControllerActivity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Button, StandardMapping};
    use crate::test_utils::MockRenderer;

    #[test]
    fn press_flashes_device() {
        let mut act = ControllerActivity::new();
        let pad = StandardMapping::gamepad(0);
        act.input(&pad, &InputEvent::ButtonPress(Button::Confirm));
        assert!(act.is_flashing(DeviceId::Gamepad(0)));
        act.update(100);
        assert!(act.is_flashing(DeviceId::Gamepad(0)));
        act.update(200);
        assert!(!act.is_flashing(DeviceId::Gamepad(0)));
    }

    #[test]
    fn release_registers_device_without_flash() {
        let mut act = ControllerActivity::new();
        act.input(
            &StandardMapping::keyboard(),
            &InputEvent::ButtonRelease(Button::Up),
        );
        assert_eq!(act.device_count(), 1);
        assert!(!act.is_flashing(DeviceId::Keyboard));
    }

    #[test]
    fn one_square_per_device() {
        let mut act = ControllerActivity::new();
        let press = InputEvent::ButtonPress(Button::Up);
        act.input(&StandardMapping::gamepad(0), &press);
        act.input(&StandardMapping::gamepad(1), &press);
        act.input(&StandardMapping::gamepad(0), &press);
        assert_eq!(act.device_count(), 2);

        let mut r = MockRenderer::new(640, 480);
        act.render(&mut r).unwrap();
        assert_eq!(r.fill_rect_count(), 2);
    }
}

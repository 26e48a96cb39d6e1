//! Input routing.

use crate::config::keys;
use crate::input::{Action, DeviceId, InputConfig, InputEvent, Key};

use super::Window;

/// What the router did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    /// Used to drive an interactive screensaver.
    ScreenSaverControl,
    /// Woke the system from sleep.
    Woke,
    /// Stopped the running screensaver.
    ScreenSaverCancelled,
    /// Toggled the named debug setting.
    DebugToggled(&'static str),
    /// Handed to the activity indicator and the active layer.
    Forwarded { consumed: bool },
}

/// Ctrl+<key> debug toggles, keyboard only.
fn debug_toggle(config: &dyn InputConfig, event: &InputEvent) -> Option<&'static str> {
    if config.device_id() != DeviceId::Keyboard {
        return None;
    }
    let InputEvent::Key {
        key: Key::Char(c),
        pressed: true,
        modifiers,
    } = event
    else {
        return None;
    };
    if !modifiers.left_ctrl {
        return None;
    }
    match c.to_ascii_lowercase() {
        'g' => Some(keys::DEBUG_GRID),
        't' => Some(keys::DEBUG_TEXT),
        'i' => Some(keys::DEBUG_IMAGE),
        _ => None,
    }
}

impl Window {
    /// Route one input event.
    ///
    /// In order: interactive screensaver controls, wake from sleep, cancel a
    /// running screensaver, debug toggles, then the activity indicator and
    /// the active layer. Every branch after the screensaver controls resets
    /// the idle timer.
    pub fn input(&mut self, config: &dyn InputConfig, event: &InputEvent) -> InputDisposition {
        if let Some(handled) = self.screensaver_controls(config, event) {
            return handled;
        }

        if self.idle.sleeping {
            self.wake();
            return InputDisposition::Woke;
        }

        self.idle.reset();
        if self.cancel_screensaver() {
            return InputDisposition::ScreenSaverCancelled;
        }

        if let Some(key) = debug_toggle(config, event) {
            let on = self.settings.toggle(key);
            log::debug!("{key} = {on}");
            return InputDisposition::DebugToggled(key);
        }

        self.activity.input(config, event);
        let consumed = self
            .stack
            .top_mut()
            .is_some_and(|top| top.input(config, event));
        InputDisposition::Forwarded { consumed }
    }

    /// Next/launch handling while an interactive screensaver shows content.
    /// Launching falls through to the wake path.
    fn screensaver_controls(
        &mut self,
        config: &dyn InputConfig,
        event: &InputEvent,
    ) -> Option<InputDisposition> {
        if !self.idle.screensaver_running
            || !self.settings.get_bool(keys::SCREENSAVER_CONTROLS)
            || !self.settings.screensaver_behavior().is_interactive()
        {
            return None;
        }
        let saver = self.screensaver.as_mut()?;
        if !saver.has_current_content() {
            return None;
        }
        let next = config.is_mapped_like(Action::Right, event)
            || config.is_mapped_to(Action::Select, event);
        if next {
            if event.is_press() {
                saver.next_content();
            }
            return Some(InputDisposition::ScreenSaverControl);
        }
        if config.is_mapped_to(Action::Start, event) && event.is_press() {
            self.cancel_screensaver();
            if let Some(saver) = self.screensaver.as_mut() {
                saver.launch_content();
            }
            self.idle.sleeping = true;
        }
        None
    }

    /// Committed text goes straight to the active layer.
    pub fn text_input(&mut self, text: &str) {
        if let Some(top) = self.stack.top_mut() {
            top.text_input(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Button, Modifiers, StandardMapping};

    fn ctrl(c: char) -> InputEvent {
        InputEvent::Key {
            key: Key::Char(c),
            pressed: true,
            modifiers: Modifiers::LEFT_CTRL,
        }
    }

    #[test]
    fn debug_keys_need_keyboard_and_left_ctrl() {
        let kb = StandardMapping::keyboard();
        assert_eq!(debug_toggle(&kb, &ctrl('g')), Some(keys::DEBUG_GRID));
        assert_eq!(debug_toggle(&kb, &ctrl('T')), Some(keys::DEBUG_TEXT));
        assert_eq!(debug_toggle(&kb, &ctrl('i')), Some(keys::DEBUG_IMAGE));
        assert_eq!(debug_toggle(&kb, &ctrl('x')), None);

        let plain = InputEvent::Key {
            key: Key::Char('g'),
            pressed: true,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(debug_toggle(&kb, &plain), None);

        let release = InputEvent::Key {
            key: Key::Char('g'),
            pressed: false,
            modifiers: Modifiers::LEFT_CTRL,
        };
        assert_eq!(debug_toggle(&kb, &release), None);

        let pad = StandardMapping::gamepad(0);
        assert_eq!(debug_toggle(&pad, &ctrl('g')), None);
        assert_eq!(
            debug_toggle(&pad, &InputEvent::ButtonPress(Button::Confirm)),
            None
        );
    }
}

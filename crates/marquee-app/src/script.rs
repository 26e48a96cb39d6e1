//! Frame-indexed input script for headless runs.

use marquee_core::input::{Button, InputEvent, Key, Modifiers};

/// Which mapping an event is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Pad,
    Keyboard,
}

#[derive(Debug, Clone)]
pub struct ScriptedEvent {
    pub frame: u32,
    pub device: Device,
    pub event: InputEvent,
}

fn tap(frame: u32, button: Button) -> [ScriptedEvent; 2] {
    [
        ScriptedEvent {
            frame,
            device: Device::Pad,
            event: InputEvent::ButtonPress(button),
        },
        ScriptedEvent {
            frame: frame + 1,
            device: Device::Pad,
            event: InputEvent::ButtonRelease(button),
        },
    ]
}

fn ctrl_key(frame: u32, ch: char) -> ScriptedEvent {
    ScriptedEvent {
        frame,
        device: Device::Keyboard,
        event: InputEvent::Key {
            key: Key::Char(ch),
            pressed: true,
            modifiers: Modifiers::LEFT_CTRL,
        },
    }
}

/// The default demo: browse, open and close a dialog, toggle the debug
/// grid on and off, then go quiet so the screensaver kicks in, and finally
/// wake it up.
pub fn demo_script() -> Vec<ScriptedEvent> {
    let mut events = Vec::new();
    events.extend(tap(20, Button::Down));
    events.extend(tap(30, Button::Down));
    events.extend(tap(40, Button::Confirm));
    events.extend(tap(70, Button::Cancel));
    events.push(ctrl_key(80, 'g'));
    events.push(ctrl_key(90, 'g'));
    events.extend(tap(280, Button::Up));
    events
}

/// Cursor over a script sorted by frame.
#[derive(Debug)]
pub struct Script {
    events: Vec<ScriptedEvent>,
    next: usize,
}

impl Script {
    pub fn new(mut events: Vec<ScriptedEvent>) -> Self {
        events.sort_by_key(|e| e.frame);
        Self { events, next: 0 }
    }

    /// Events due on `frame`, plus any skipped earlier ones.
    pub fn due(&mut self, frame: u32) -> &[ScriptedEvent] {
        let start = self.next;
        while self.next < self.events.len() && self.events[self.next].frame <= frame {
            self.next += 1;
        }
        &self.events[start..self.next]
    }

    pub fn is_finished(&self) -> bool {
        self.next == self.events.len()
    }
}

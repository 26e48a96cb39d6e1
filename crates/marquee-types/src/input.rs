//! Platform-agnostic input event types and semantic mappings.
//!
//! Every backend maps its native input to these enums. The controller never
//! sees raw platform input; it asks an [`InputConfig`] whether an event
//! matches a semantic [`Action`].

use serde::{Deserialize, Serialize};

/// Identifies the device an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceId {
    /// The physical keyboard.
    Keyboard,
    /// A game controller, indexed by connection slot.
    Gamepad(u8),
    /// A TV remote forwarded over HDMI-CEC.
    Cec,
}

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A face / d-pad button pressed.
    ButtonPress(Button),
    /// A face / d-pad button released.
    ButtonRelease(Button),
    /// Shoulder trigger pressed.
    TriggerPress(Trigger),
    /// Shoulder trigger released.
    TriggerRelease(Trigger),
    /// Keyboard key transition with the modifier state at that moment.
    Key {
        key: Key,
        pressed: bool,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Whether this event is a press (non-zero value) rather than a release.
    pub fn is_press(&self) -> bool {
        match self {
            Self::ButtonPress(_) | Self::TriggerPress(_) => true,
            Self::ButtonRelease(_) | Self::TriggerRelease(_) => false,
            Self::Key { pressed, .. } => *pressed,
        }
    }
}

/// Buttons that map across all platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    Triangle,
    Square,
    Start,
    Select,
}

/// Shoulder / trigger buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    Left,
    Right,
}

/// Keyboard keys the front-end cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    F(u8),
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub left_ctrl: bool,
    pub right_ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        left_ctrl: false,
        right_ctrl: false,
        shift: false,
        alt: false,
    };

    pub const LEFT_CTRL: Self = Self {
        left_ctrl: true,
        right_ctrl: false,
        shift: false,
        alt: false,
    };
}

/// Semantic actions a device mapping resolves events to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    L,
    R,
    Start,
    Select,
}

/// Per-device mapping from raw events to semantic actions.
pub trait InputConfig {
    /// The device this mapping belongs to.
    fn device_id(&self) -> DeviceId;

    /// Whether `event` is exactly the input bound to `action`.
    fn is_mapped_to(&self, action: Action, event: &InputEvent) -> bool;

    /// Whether `event` behaves like `action`. Directional actions also match
    /// their shoulder equivalents (L pages left, R pages right).
    fn is_mapped_like(&self, action: Action, event: &InputEvent) -> bool {
        if self.is_mapped_to(action, event) {
            return true;
        }
        match action {
            Action::Left => self.is_mapped_to(Action::L, event),
            Action::Right => self.is_mapped_to(Action::R, event),
            _ => false,
        }
    }
}

/// Default mapping used by the desktop build and tests.
///
/// Gamepads use the platform-neutral [`Button`]/[`Trigger`] layout; the
/// keyboard uses arrows, Enter/Escape, and F1/F2 for start/select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardMapping {
    device: DeviceId,
}

impl StandardMapping {
    pub fn new(device: DeviceId) -> Self {
        Self { device }
    }

    pub fn keyboard() -> Self {
        Self::new(DeviceId::Keyboard)
    }

    pub fn gamepad(slot: u8) -> Self {
        Self::new(DeviceId::Gamepad(slot))
    }
}

impl InputConfig for StandardMapping {
    fn device_id(&self) -> DeviceId {
        self.device
    }

    fn is_mapped_to(&self, action: Action, event: &InputEvent) -> bool {
        match event {
            InputEvent::ButtonPress(b) | InputEvent::ButtonRelease(b) => {
                let mapped = match b {
                    Button::Up => Action::Up,
                    Button::Down => Action::Down,
                    Button::Left => Action::Left,
                    Button::Right => Action::Right,
                    Button::Confirm => Action::A,
                    Button::Cancel => Action::B,
                    Button::Triangle => Action::X,
                    Button::Square => Action::Y,
                    Button::Start => Action::Start,
                    Button::Select => Action::Select,
                };
                mapped == action
            },
            InputEvent::TriggerPress(t) | InputEvent::TriggerRelease(t) => {
                let mapped = match t {
                    Trigger::Left => Action::L,
                    Trigger::Right => Action::R,
                };
                mapped == action
            },
            InputEvent::Key { key, .. } => {
                let mapped = match key {
                    Key::Up => Action::Up,
                    Key::Down => Action::Down,
                    Key::Left => Action::Left,
                    Key::Right => Action::Right,
                    Key::Enter => Action::A,
                    Key::Escape | Key::Backspace => Action::B,
                    Key::Tab => Action::X,
                    Key::F(1) => Action::Start,
                    Key::F(2) => Action::Select,
                    _ => return false,
                };
                mapped == action
            },
        }
    }
}

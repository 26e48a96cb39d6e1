//! Settings store and TOML configuration.
//!
//! [`Settings`] is a typed key/value store seeded with defaults for every key
//! the controller reads. [`MarqueeConfig`] bundles it with the window
//! geometry and loads both from a `marquee.toml` file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MarqueeError, Result};

/// Setting keys read by the controller.
pub mod keys {
    pub const DRAW_FRAMERATE: &str = "DrawFramerate";
    pub const DRAW_CLOCK: &str = "DrawClock";
    pub const SHOW_CONTROLLER_ACTIVITY: &str = "ShowControllerActivity";
    pub const SHOW_BATTERY: &str = "ShowBattery";
    pub const VOLUME_POPUP: &str = "VolumePopup";
    /// Idle time in milliseconds before the screensaver starts; 0 disables.
    pub const SCREENSAVER_TIME: &str = "ScreenSaverTime";
    pub const SCREENSAVER_CONTROLS: &str = "ScreenSaverControls";
    pub const SCREENSAVER_BEHAVIOR: &str = "ScreenSaverBehavior";
    pub const DISPLAY_TITLES: &str = "audio.display_titles";
    /// Seconds a "now playing" popup stays up.
    pub const DISPLAY_TITLES_TIME: &str = "audio.display_titles_time";
    pub const DEBUG_GRID: &str = "DebugGrid";
    pub const DEBUG_TEXT: &str = "DebugText";
    pub const DEBUG_IMAGE: &str = "DebugImage";
}

/// A single typed setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Typed key/value settings store.
///
/// Reads of a missing key, or of a key holding a different type, return the
/// type's zero value (`false`, `0`, `""`).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
}

impl Settings {
    /// A store holding the default value for every known key.
    pub fn new() -> Self {
        let mut s = Self::empty();
        s.set_bool(keys::DRAW_FRAMERATE, false);
        s.set_bool(keys::DRAW_CLOCK, true);
        s.set_bool(keys::SHOW_CONTROLLER_ACTIVITY, true);
        s.set_bool(keys::SHOW_BATTERY, true);
        s.set_bool(keys::VOLUME_POPUP, true);
        s.set_int(keys::SCREENSAVER_TIME, 5 * 60 * 1000);
        s.set_bool(keys::SCREENSAVER_CONTROLS, true);
        s.set_string(keys::SCREENSAVER_BEHAVIOR, "dim");
        s.set_bool(keys::DISPLAY_TITLES, true);
        s.set_int(keys::DISPLAY_TITLES_TIME, 10);
        s.set_bool(keys::DEBUG_GRID, false);
        s.set_bool(keys::DEBUG_TEXT, false);
        s.set_bool(keys::DEBUG_IMAGE, false);
        s
    }

    /// A store with no keys at all.
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(SettingValue::Bool(true)))
    }

    pub fn get_int(&self, key: &str) -> i64 {
        match self.values.get(key) {
            Some(SettingValue::Int(v)) => *v,
            _ => 0,
        }
    }

    pub fn get_string(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(SettingValue::Str(v)) => v,
            _ => "",
        }
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), SettingValue::Bool(value));
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), SettingValue::Int(value));
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), SettingValue::Str(value.to_string()));
    }

    /// Flip a boolean setting and return its new value.
    pub fn toggle(&mut self, key: &str) -> bool {
        let next = !self.get_bool(key);
        self.set_bool(key, next);
        next
    }

    /// Overlay `other` on top of this store, key by key.
    pub fn merge(&mut self, other: HashMap<String, SettingValue>) {
        self.values.extend(other);
    }

    /// Configured screensaver behavior.
    pub fn screensaver_behavior(&self) -> ScreenSaverBehavior {
        ScreenSaverBehavior::from_setting(self.get_string(keys::SCREENSAVER_BEHAVIOR))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// What the screensaver shows while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSaverBehavior {
    Dim,
    Black,
    Slideshow,
    RandomVideo,
}

impl ScreenSaverBehavior {
    /// Parse the settings string. Unknown values fall back to `Dim`.
    pub fn from_setting(s: &str) -> Self {
        match s {
            "black" => Self::Black,
            "slideshow" => Self::Slideshow,
            "random video" => Self::RandomVideo,
            _ => Self::Dim,
        }
    }

    /// Behaviors that show content the user can skip through or launch.
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Slideshow | Self::RandomVideo)
    }
}

/// Window geometry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_width() -> u32 {
    640
}
fn default_height() -> u32 {
    480
}
fn default_title() -> String {
    "Marquee".to_string()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    window: WindowConfig,
    #[serde(default)]
    settings: HashMap<String, SettingValue>,
}

/// Full front-end configuration (`marquee.toml`).
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    pub window: WindowConfig,
    pub settings: Settings,
}

impl MarqueeConfig {
    /// Parse a configuration document. Keys absent from `[settings]` keep
    /// their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)
            .map_err(|e| MarqueeError::Config(format!("marquee.toml: {e}")))?;
        let mut settings = Settings::new();
        settings.merge(raw.settings);
        Ok(Self {
            window: raw.window,
            settings,
        })
    }

    /// Load from a file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

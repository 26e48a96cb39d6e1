//! The `screen` section of a theme.
//!
//! Describes the controller-level decorations: clock and help-strip styling,
//! the dim overlay drawn behind dialogs, indicator colors, and "screen
//! extras" -- decorative layers drawn above everything else in z order.
//! Element geometry is given as fractions of the screen size.

use std::path::Path;

use serde::Deserialize;

use crate::backend::{Color, Renderer};
use crate::error::{MarqueeError, Result};
use crate::help::HelpStyle;
use crate::layer::GuiLayer;

/// Default clock color when neither the clock nor the help system is themed.
pub const DEFAULT_CLOCK_COLOR: Color = Color::from_rgba_u32(0x777777FF);

/// Clock text styling.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockTheme {
    pub color: Option<Color>,
    pub font_size: Option<u16>,
}

/// Help strip styling.
#[derive(Debug, Clone, Deserialize)]
pub struct HelpTheme {
    pub text_color: Option<Color>,
    pub icon_color: Option<Color>,
    pub font_size: Option<u16>,
    /// Top-left as `[x, y]` screen fractions.
    pub origin: Option<[f32; 2]>,
}

/// Styling shared by the small status indicators.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorTheme {
    pub color: Option<Color>,
    pub active_color: Option<Color>,
    pub font_size: Option<u16>,
}

/// Overlay drawn between the bottom layer and a dialog.
#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundTheme {
    #[serde(default = "default_fade_color")]
    pub fade_color: Color,
}

fn default_fade_color() -> Color {
    Color::rgba(0, 0, 0, 160)
}

impl Default for BackgroundTheme {
    fn default() -> Self {
        Self {
            fade_color: default_fade_color(),
        }
    }
}

/// One decorative element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExtraElement {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        #[serde(default)]
        radius: u16,
        #[serde(default)]
        z_index: i32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Color,
        #[serde(default = "default_extra_font")]
        font_size: u16,
        #[serde(default)]
        z_index: i32,
    },
}

fn default_extra_font() -> u16 {
    16
}

impl ExtraElement {
    pub fn z_index(&self) -> i32 {
        match self {
            Self::Rect { z_index, .. } | Self::Text { z_index, .. } => *z_index,
        }
    }
}

/// The `screen` theme section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreenTheme {
    #[serde(default)]
    pub clock: Option<ClockTheme>,
    #[serde(default)]
    pub help: Option<HelpTheme>,
    #[serde(default)]
    pub controller_activity: Option<IndicatorTheme>,
    #[serde(default)]
    pub battery_indicator: Option<IndicatorTheme>,
    #[serde(default)]
    pub background: BackgroundTheme,
    #[serde(default)]
    pub extras: Vec<ExtraElement>,
}

impl ScreenTheme {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MarqueeError::Theme(format!("screen theme: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Clock color and font size. Without a clock element the help-system
    /// style is reused so the clock blends with the help strip.
    pub fn clock_style(&self, default_font: u16) -> (Color, u16) {
        if let Some(clock) = &self.clock {
            return (
                clock.color.unwrap_or(DEFAULT_CLOCK_COLOR),
                clock.font_size.unwrap_or(default_font),
            );
        }
        match &self.help {
            Some(help) => (
                help.text_color.unwrap_or(DEFAULT_CLOCK_COLOR),
                help.font_size.unwrap_or(default_font),
            ),
            None => (DEFAULT_CLOCK_COLOR, default_font),
        }
    }

    /// Help strip style, falling back to defaults field by field.
    pub fn help_style(&self) -> HelpStyle {
        let mut style = HelpStyle::default();
        if let Some(help) = &self.help {
            if let Some(c) = help.text_color {
                style.text_color = c;
            }
            if let Some(c) = help.icon_color {
                style.icon_color = c;
            }
            if let Some(fs) = help.font_size {
                style.font_size = fs;
            }
            if let Some([x, y]) = help.origin {
                style.origin = (x, y);
            }
        }
        style
    }

    /// Build the extra layers, stably sorted by ascending z index.
    pub fn build_extras(&self) -> Vec<Box<dyn GuiLayer>> {
        let mut extras: Vec<Box<dyn GuiLayer>> = self
            .extras
            .iter()
            .cloned()
            .map(|e| Box::new(ScreenExtra::new(e)) as Box<dyn GuiLayer>)
            .collect();
        extras.sort_by_key(|e| e.z_index());
        extras
    }
}

/// A theme-defined decorative layer.
///
/// Hidden while the screensaver runs and while the GUI is deinitialised.
#[derive(Debug, Clone)]
pub struct ScreenExtra {
    element: ExtraElement,
    opacity: u8,
    hidden: bool,
}

impl ScreenExtra {
    pub fn new(element: ExtraElement) -> Self {
        Self {
            element,
            opacity: 255,
            hidden: false,
        }
    }
}

impl GuiLayer for ScreenExtra {
    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        if self.hidden || self.opacity == 0 {
            return Ok(());
        }
        let (sw, sh) = renderer.screen_size();
        let (sw, sh) = (sw as f32, sh as f32);
        match &self.element {
            ExtraElement::Rect {
                x,
                y,
                w,
                h,
                color,
                radius,
                ..
            } => renderer.fill_rounded_rect(
                (x * sw) as i32,
                (y * sh) as i32,
                (w * sw) as u32,
                (h * sh) as u32,
                *radius,
                color.faded(self.opacity),
            ),
            ExtraElement::Text {
                x,
                y,
                text,
                color,
                font_size,
                ..
            } => renderer.draw_text(
                text,
                (x * sw) as i32,
                (y * sh) as i32,
                *font_size,
                color.faded(self.opacity),
            ),
        }
    }

    fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    fn z_index(&self) -> i32 {
        self.element.z_index()
    }

    fn on_show(&mut self) {
        self.hidden = false;
    }

    fn on_hide(&mut self) {
        self.hidden = true;
    }

    fn on_screensaver_activate(&mut self) {
        self.hidden = true;
    }

    fn on_screensaver_deactivate(&mut self) {
        self.hidden = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DrawCall, MockRenderer};

    const THEME: &str = r##"
        [clock]
        color = "#FF0000"

        [help]
        text_color = "#00FF00"
        font_size = 16

        [background]
        fade_color = "#00000080"

        [[extras]]
        kind = "text"
        x = 0.5
        y = 0.1
        text = "top"
        color = "#FFFFFF"
        z_index = 20

        [[extras]]
        kind = "rect"
        x = 0.0
        y = 0.0
        w = 1.0
        h = 0.05
        color = "#202020"
        z_index = 5

        [[extras]]
        kind = "text"
        x = 0.1
        y = 0.1
        text = "also-five"
        color = "#FFFFFF"
        z_index = 5
    "##;

    #[test]
    fn parses_full_theme() {
        let theme = ScreenTheme::from_toml(THEME).unwrap();
        assert_eq!(theme.extras.len(), 3);
        assert_eq!(theme.background.fade_color, Color::rgba(0, 0, 0, 0x80));
        assert_eq!(theme.clock_style(8), (Color::rgb(255, 0, 0), 8));
        assert_eq!(theme.help_style().font_size, 16);
    }

    #[test]
    fn empty_theme_defaults() {
        let theme = ScreenTheme::from_toml("").unwrap();
        assert!(theme.extras.is_empty());
        assert_eq!(theme.clock_style(8), (DEFAULT_CLOCK_COLOR, 8));
        assert_eq!(theme.help_style(), HelpStyle::default());
        assert_eq!(theme.background.fade_color, Color::rgba(0, 0, 0, 160));
    }

    #[test]
    fn clock_falls_back_to_help_style() {
        let theme = ScreenTheme::from_toml(
            r##"
            [help]
            text_color = "#123456"
            font_size = 24
            "##,
        )
        .unwrap();
        assert_eq!(theme.clock_style(8), (Color::rgb(0x12, 0x34, 0x56), 24));
    }

    #[test]
    fn bad_color_is_theme_error() {
        let err = ScreenTheme::from_toml("[clock]\ncolor = \"purple\"").unwrap_err();
        assert!(matches!(err, MarqueeError::Theme(_)));
    }

    #[test]
    fn extras_sorted_stably_by_z() {
        let theme = ScreenTheme::from_toml(THEME).unwrap();
        let mut extras = theme.build_extras();
        let z: Vec<i32> = extras.iter().map(|e| e.z_index()).collect();
        assert_eq!(z, vec![5, 5, 20]);

        let mut r = MockRenderer::new(100, 100);
        for e in extras.iter_mut() {
            e.render(&mut r).unwrap();
        }
        assert!(matches!(r.calls[0], DrawCall::FillRect { .. }));
        let texts = r.texts();
        assert_eq!(texts, vec!["also-five", "top"]);
    }

    #[test]
    fn extra_hidden_during_screensaver() {
        let mut extra = ScreenExtra::new(ExtraElement::Text {
            x: 0.0,
            y: 0.0,
            text: "x".into(),
            color: Color::WHITE,
            font_size: 8,
            z_index: 0,
        });
        let mut r = MockRenderer::new(100, 100);
        extra.on_screensaver_activate();
        extra.render(&mut r).unwrap();
        assert!(r.calls.is_empty());
        extra.on_screensaver_deactivate();
        extra.render(&mut r).unwrap();
        assert!(r.has_text("x"));
    }
}

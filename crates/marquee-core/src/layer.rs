//! The GUI layer trait.
//!
//! A layer is one stacked visual/interactive unit: a menu, a dialog, a popup.
//! The [`Window`](crate::window::Window) owns pushed layers and refers to them
//! by [`LayerId`]. Layers never get a reference back to the window; to change
//! the stack from inside a layer, capture a
//! [`WindowHandle`](crate::window::WindowHandle) and post a closure.

use crate::backend::Renderer;
use crate::error::Result;
use crate::help::{HelpPrompt, HelpStyle};
use crate::input::{InputConfig, InputEvent};

/// Handle to a layer owned by the window's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) u64);

/// Closed set of layer kinds the controller renders differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Full-screen view or menu.
    #[default]
    Normal,
    /// Modal message box; keeps the layer beneath it visible.
    MessageBox,
    /// Small popup; keeps the layer beneath it visible.
    Popup,
}

impl LayerKind {
    /// Kinds that leave the layer under them visible.
    pub fn shows_layer_beneath(self) -> bool {
        matches!(self, Self::MessageBox | Self::Popup)
    }
}

/// A stacked visual/interactive unit.
///
/// Only `render` is required. Every other hook has a no-op default.
pub trait GuiLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Normal
    }

    /// Handle an input event. Returns `true` if the event was consumed.
    fn input(&mut self, config: &dyn InputConfig, event: &InputEvent) -> bool {
        let _ = (config, event);
        false
    }

    /// Committed text from a keyboard or IME.
    fn text_input(&mut self, text: &str) {
        let _ = text;
    }

    /// Advance animations by `dt` milliseconds.
    fn update(&mut self, dt: u32) {
        let _ = dt;
    }

    /// Draw the layer. The window applies any transition offset through the
    /// renderer's translate stack beforehand.
    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()>;

    /// Input hints to show while this layer is on top.
    fn help_prompts(&self) -> Vec<HelpPrompt> {
        Vec::new()
    }

    /// Override the themed help style while this layer is on top.
    fn help_style(&self) -> Option<HelpStyle> {
        None
    }

    /// Told whether this layer is the active (topmost) one.
    fn set_top_window(&mut self, top: bool) {
        let _ = top;
    }

    fn set_opacity(&mut self, opacity: u8) {
        let _ = opacity;
    }

    /// `true` while the layer runs a long operation that must not be
    /// interrupted by sleep.
    fn is_processing(&self) -> bool {
        false
    }

    /// Draw order for overlay layers (screen extras); lower draws first.
    fn z_index(&self) -> i32 {
        0
    }

    fn on_show(&mut self) {}

    fn on_hide(&mut self) {}

    fn on_screensaver_activate(&mut self) {}

    fn on_screensaver_deactivate(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_that_show_beneath() {
        assert!(!LayerKind::Normal.shows_layer_beneath());
        assert!(LayerKind::MessageBox.shows_layer_beneath());
        assert!(LayerKind::Popup.shows_layer_beneath());
        assert_eq!(LayerKind::default(), LayerKind::Normal);
    }
}

//! Marquee presentation controller.
//!
//! Owns the GUI layer stack, routes input, drives the per-frame
//! update/render pipelines, shows transient notifications and status
//! overlays, and runs the idle/screensaver/sleep state machine. All I/O goes
//! through collaborator traits; this crate has no platform dependencies.

// Re-exports from marquee-types (foundation types and traits).
pub use marquee_types::backend;
pub use marquee_types::config;
pub use marquee_types::error;
pub use marquee_types::input;
pub use marquee_platform as platform;

pub mod help;
pub mod layer;
pub mod overlay;
pub mod services;
pub mod theme;
pub mod window;

#[cfg(test)]
pub(crate) mod test_utils;

pub use layer::{GuiLayer, LayerId, LayerKind};
pub use window::{Window, WindowHandle};

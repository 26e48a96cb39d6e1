//! Status overlays drawn by the window above the GUI stack.
//!
//! None of these are stack layers: the window owns them directly and calls
//! their `update`/`render` at fixed points of the frame pipeline.

mod activity;
mod battery;
mod clock;
mod framerate;
mod popup;
mod progress;
mod screensaver;
mod splash;
mod volume;

pub use activity::ControllerActivity;
pub use battery::BatteryIndicator;
pub use clock::ClockOverlay;
pub use framerate::FrameStats;
pub use popup::InfoPopup;
pub use progress::ProgressNotification;
pub use screensaver::DimScreenSaver;
pub use splash::Splash;
pub use volume::VolumeInfo;

/// Small overlay text (clock, indicators, help strip).
pub const FONT_SMALL: u16 = 8;
/// Medium text (popups, splash, framerate).
pub const FONT_MEDIUM: u16 = 16;

/// Alpha for a fade that lasts `fade_ms` at each end of a `total_ms` span.
pub(crate) fn fade_alpha(elapsed_ms: u32, total_ms: u32, fade_ms: u32) -> u8 {
    if fade_ms == 0 {
        return 255;
    }
    let remaining = total_ms.saturating_sub(elapsed_ms);
    let edge = elapsed_ms.min(remaining).min(fade_ms);
    (edge * 255 / fade_ms) as u8
}

//! Platform services consumed by the Marquee controller.
//!
//! The clock overlay reads [`TimeService`], the battery overlay reads
//! [`PowerService`]. [`DesktopPlatform`] implements both with `std` and the
//! Linux power-supply class in sysfs.

mod services;

pub use services::*;

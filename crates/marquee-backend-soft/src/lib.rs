//! Software render target for Marquee.
//!
//! [`SoftwareRenderer`] rasterizes every [`Renderer`] primitive into an
//! in-memory RGBA buffer. The desktop app presents it as PNG snapshots and
//! headless tests read pixels back directly.
//!
//! [`Renderer`]: marquee_types::backend::Renderer

mod font;
mod renderer;

pub use renderer::SoftwareRenderer;

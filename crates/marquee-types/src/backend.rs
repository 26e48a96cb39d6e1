//! Renderer trait definition.
//!
//! Every platform implements [`Renderer`]. The controller dispatches all
//! drawing through this trait boundary -- it never calls platform-specific
//! APIs.
//!
//! The trait has a small set of required primitives and a handful of
//! extended methods with default implementations built on top of them, so
//! simple backends only need the core set.

use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// A color in RGBA format (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a different alpha value.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Scale the alpha channel by `opacity / 255`.
    pub fn faded(self, opacity: u8) -> Self {
        let a = (self.a as u16 * opacity as u16 / 255) as u8;
        self.with_alpha(a)
    }

    /// Build a color from a packed `0xRRGGBBAA` value.
    pub const fn from_rgba_u32(v: u32) -> Self {
        Self::rgba((v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA`, `RRGGBB` or `RRGGBBAA`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        let v = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Self::from_rgba_u32((v << 8) | 0xFF)),
            8 => Some(Self::from_rgba_u32(v)),
            _ => None,
        }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
    }
}

/// Video memory usage reported by a renderer, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VramUsage {
    pub font_bytes: u64,
    pub texture_bytes: u64,
    pub texture_max_bytes: u64,
}

/// Width in pixels of one bitmap glyph at `font_size`.
///
/// The built-in 8x8 font is scaled by whole multiples of 8.
pub fn bitmap_glyph_width(font_size: u16) -> u32 {
    8 * (font_size / 8).max(1) as u32
}

/// Measure a string rendered with the built-in 8x8 bitmap font.
pub fn bitmap_measure_text(text: &str, font_size: u16) -> u32 {
    text.chars().count() as u32 * bitmap_glyph_width(font_size)
}

/// Rendering backend trait.
///
/// # Core Methods (required)
///
/// `init`, `clear`, `fill_rect`, `draw_text`, `measure_text`, `screen_size`,
/// `swap_buffers`, `push_translate`, `pop_translate` and `shutdown`.
///
/// # Extended Primitives (optional, with defaults)
///
/// Rounded rectangles, gradients, dimming, clip ("stencil") regions and
/// memory statistics default to approximations over the core set.
pub trait Renderer {
    // -----------------------------------------------------------------------
    // Core methods
    // -----------------------------------------------------------------------

    /// Initialize the rendering subsystem.
    fn init(&mut self, width: u32, height: u32) -> Result<()>;

    /// Clear the screen to a solid color.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Draw a filled rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    /// Draw text at the given position. `font_size` is a hint in pixels.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: u16, color: Color)
    -> Result<()>;

    /// Width of `text` in pixels at `font_size`.
    fn measure_text(&self, text: &str, font_size: u16) -> u32;

    /// Current screen size in pixels.
    fn screen_size(&self) -> (u32, u32);

    /// Present the current frame.
    fn swap_buffers(&mut self) -> Result<()>;

    /// Push a translation applied to all subsequent draws.
    fn push_translate(&mut self, dx: i32, dy: i32) -> Result<()>;

    /// Pop the most recent translation.
    fn pop_translate(&mut self) -> Result<()>;

    /// Release all resources.
    fn shutdown(&mut self) -> Result<()>;

    // -----------------------------------------------------------------------
    // Extended
    // -----------------------------------------------------------------------

    fn screen_width(&self) -> u32 {
        self.screen_size().0
    }

    fn screen_height(&self) -> u32 {
        self.screen_size().1
    }

    /// Handheld-class displays where overlays compete with content for space.
    fn is_small_screen(&self) -> bool {
        let (w, h) = self.screen_size();
        w < 400 || h < 400
    }

    /// Line height of the font at `font_size`.
    fn measure_text_height(&self, font_size: u16) -> u32 {
        bitmap_glyph_width(font_size)
    }

    /// Draw a filled rectangle with rounded corners.
    fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        _radius: u16,
        color: Color,
    ) -> Result<()> {
        self.fill_rect(x, y, w, h, color)
    }

    /// Draw a rectangle with a horizontal gradient (left to right).
    fn fill_rect_gradient_h(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        left: Color,
        right: Color,
    ) -> Result<()> {
        let _ = right;
        self.fill_rect(x, y, w, h, left)
    }

    /// Darken the whole viewport.
    fn dim_screen(&mut self, alpha: u8) -> Result<()> {
        let (w, h) = self.screen_size();
        self.fill_rect(0, 0, w, h, Color::rgba(0, 0, 0, alpha))
    }

    /// Restrict drawing to a rounded region (stencil). Default: no-op.
    fn push_rounded_clip(&mut self, x: i32, y: i32, w: u32, h: u32, radius: u16) -> Result<()> {
        let _ = (x, y, w, h, radius);
        Ok(())
    }

    /// Remove the most recent clip region. Default: no-op.
    fn pop_clip(&mut self) -> Result<()> {
        Ok(())
    }

    /// Memory held by fonts and textures.
    fn vram_usage(&self) -> VramUsage {
        VramUsage::default()
    }
}

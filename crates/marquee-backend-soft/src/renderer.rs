//! Software RGBA framebuffer renderer.
//!
//! Implements [`Renderer`] by drawing into a `Vec<u8>` RGBA buffer. Rounded
//! rectangles, gradients, dimming and rounded clip regions are all
//! rasterized in software.

use marquee_types::backend::{Color, Renderer, VramUsage};
use marquee_types::error::{MarqueeError, Result};

use crate::font;

/// A clip region in screen coordinates. Pixels outside the rectangle, or
/// outside the rounded corners when `radius > 0`, are discarded.
#[derive(Debug, Clone, Copy)]
struct ClipRegion {
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    radius: u32,
}

impl ClipRegion {
    fn contains(&self, px: i32, py: i32) -> bool {
        let x2 = self.x.saturating_add(self.w as i32);
        let y2 = self.y.saturating_add(self.h as i32);
        if px < self.x || py < self.y || px >= x2 || py >= y2 {
            return false;
        }
        let r = self.radius.min(self.w / 2).min(self.h / 2) as i32;
        if r == 0 {
            return true;
        }
        // Distance from the nearest corner circle center, if in a corner.
        let cx = if px < self.x + r {
            self.x + r
        } else if px >= x2 - r {
            x2 - r - 1
        } else {
            return true;
        };
        let cy = if py < self.y + r {
            self.y + r
        } else if py >= y2 - r {
            y2 - r - 1
        } else {
            return true;
        };
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= r * r
    }
}

/// Linearly interpolate between two u8 values.
fn lerp_u8(a: u8, b: u8, t_num: u32, t_den: u32) -> u8 {
    if t_den == 0 {
        return a;
    }
    let a32 = a as u32;
    let b32 = b as u32;
    ((a32 * (t_den - t_num) + b32 * t_num + t_den / 2) / t_den) as u8
}

fn lerp_color(a: Color, b: Color, num: u32, den: u32) -> Color {
    Color::rgba(
        lerp_u8(a.r, b.r, num, den),
        lerp_u8(a.g, b.g, num, den),
        lerp_u8(a.b, b.b, num, den),
        lerp_u8(a.a, b.a, num, den),
    )
}

/// Glyph scale for a font size hint; the 8x8 font scales by whole steps.
fn glyph_scale(font_size: u16) -> u32 {
    (font_size / 8).max(1) as u32
}

/// Software RGBA framebuffer renderer.
///
/// All rendering operations write directly to the pixel buffer. A dirty flag
/// tracks whether the buffer changed since the consumer last read it.
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
    dirty: bool,
    frames_presented: u64,
    clip_stack: Vec<ClipRegion>,
    translate_stack: Vec<(i32, i32)>,
    cumulative_translate: (i32, i32),
}

impl SoftwareRenderer {
    /// Create a renderer with the given resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0; (width * height * 4) as usize],
            dirty: true,
            frames_presented: 0,
            clip_stack: Vec::new(),
            translate_stack: Vec::new(),
            cumulative_translate: (0, 0),
        }
    }

    /// The RGBA pixel buffer, row-major, 4 bytes per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    /// One pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let px = self.buffer.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether the buffer has been modified since the last `clear_dirty()`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of `swap_buffers` calls since creation.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    fn translate(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x + self.cumulative_translate.0,
            y + self.cumulative_translate.1,
        )
    }

    /// Blend a single pixel. Performs bounds and clip checking.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || color.a == 0 {
            return;
        }
        let (ux, uy) = (x as u32, y as u32);
        if ux >= self.width || uy >= self.height {
            return;
        }
        if !self.clip_stack.iter().all(|c| c.contains(x, y)) {
            return;
        }
        let offset = ((uy * self.width + ux) * 4) as usize;
        let px = &mut self.buffer[offset..offset + 4];
        if color.a == 255 {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
            return;
        }
        // Source-over.
        let sa = color.a as u16;
        let da = 255 - sa;
        let blend = |s: u8, d: u8| ((s as u16 * sa + d as u16 * da + 127) / 255) as u8;
        px[0] = blend(color.r, px[0]);
        px[1] = blend(color.g, px[1]);
        px[2] = blend(color.b, px[2]);
        px[3] = 255;
    }

    fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.set_pixel(x, y, color);
        }
    }
}

impl Renderer for SoftwareRenderer {
    fn init(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(MarqueeError::Backend(format!(
                "invalid resolution {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        self.buffer = vec![0; (width * height * 4) as usize];
        self.dirty = true;
        log::info!("Software renderer initialized at {width}x{height}");
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        self.dirty = true;
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        if w == 0 {
            return Ok(());
        }
        let (tx, ty) = self.translate(x, y);
        for dy in 0..h as i32 {
            self.hline(tx, tx + w as i32 - 1, ty + dy, color);
        }
        self.dirty = true;
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    ) -> Result<()> {
        let (tx, ty) = self.translate(x, y);
        let scale = glyph_scale(font_size) as i32;
        let glyph_w = font::GLYPH_WIDTH as i32 * scale;

        let mut cx = tx;
        for ch in text.chars() {
            let rows = font::glyph(ch);
            for (row, bits) in rows.iter().enumerate().take(font::GLYPH_HEIGHT as usize) {
                for col in 0..font::GLYPH_WIDTH {
                    if !font::is_set(*bits, col) {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.set_pixel(
                                cx + col as i32 * scale + sx,
                                ty + row as i32 * scale + sy,
                                color,
                            );
                        }
                    }
                }
            }
            cx += glyph_w;
        }
        self.dirty = true;
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size: u16) -> u32 {
        text.chars().count() as u32 * font::GLYPH_WIDTH * glyph_scale(font_size)
    }

    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.frames_presented += 1;
        Ok(())
    }

    fn push_translate(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.translate_stack.push(self.cumulative_translate);
        self.cumulative_translate.0 += dx;
        self.cumulative_translate.1 += dy;
        Ok(())
    }

    fn pop_translate(&mut self) -> Result<()> {
        if let Some(prev) = self.translate_stack.pop() {
            self.cumulative_translate = prev;
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.clip_stack.clear();
        self.translate_stack.clear();
        self.cumulative_translate = (0, 0);
        log::info!(
            "Software renderer shut down after {} frames",
            self.frames_presented
        );
        Ok(())
    }

    // -------------------------------------------------------------------
    // Extended
    // -------------------------------------------------------------------

    fn measure_text_height(&self, font_size: u16) -> u32 {
        font::GLYPH_HEIGHT * glyph_scale(font_size)
    }

    fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        radius: u16,
        color: Color,
    ) -> Result<()> {
        if radius == 0 || w == 0 || h == 0 {
            return self.fill_rect(x, y, w, h, color);
        }
        let (tx, ty) = self.translate(x, y);
        let shape = ClipRegion {
            x: tx,
            y: ty,
            w,
            h,
            radius: radius as u32,
        };
        for py in ty..ty + h as i32 {
            for px in tx..tx + w as i32 {
                if shape.contains(px, py) {
                    self.set_pixel(px, py, color);
                }
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn fill_rect_gradient_h(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        left: Color,
        right: Color,
    ) -> Result<()> {
        let (tx, ty) = self.translate(x, y);
        let den = w.saturating_sub(1).max(1);
        for dx in 0..w as i32 {
            let color = lerp_color(left, right, dx as u32, den);
            for dy in 0..h as i32 {
                self.set_pixel(tx + dx, ty + dy, color);
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn dim_screen(&mut self, alpha: u8) -> Result<()> {
        // Covers the viewport regardless of any active translation.
        let saved = std::mem::take(&mut self.cumulative_translate);
        let (w, h) = (self.width, self.height);
        let result = self.fill_rect(0, 0, w, h, Color::rgba(0, 0, 0, alpha));
        self.cumulative_translate = saved;
        result
    }

    fn push_rounded_clip(&mut self, x: i32, y: i32, w: u32, h: u32, radius: u16) -> Result<()> {
        let (tx, ty) = self.translate(x, y);
        self.clip_stack.push(ClipRegion {
            x: tx,
            y: ty,
            w,
            h,
            radius: radius as u32,
        });
        Ok(())
    }

    fn pop_clip(&mut self) -> Result<()> {
        if self.clip_stack.pop().is_none() {
            log::warn!("pop_clip with no active clip region");
        }
        Ok(())
    }

    fn vram_usage(&self) -> VramUsage {
        let frame = self.buffer.len() as u64;
        VramUsage {
            font_bytes: font::FONT_BYTES,
            texture_bytes: frame,
            texture_max_bytes: frame,
        }
    }
}

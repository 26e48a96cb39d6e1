//! Shared test utilities for marquee-core tests.
//!
//! Provides a [`MockRenderer`] that records draw calls and a
//! [`RecordingLayer`] that logs every hook the window invokes on it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::backend::{Color, Renderer, VramUsage};
use crate::error::Result;
use crate::help::HelpPrompt;
use crate::input::{InputConfig, InputEvent};
use crate::layer::{GuiLayer, LayerKind};

/// A recorded draw call from the mock renderer.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum DrawCall {
    Clear(Color),
    FillRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    DrawText {
        text: String,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    },
    PushTranslate(i32, i32),
    PopTranslate,
    PushClip,
    PopClip,
    Swap,
}

/// A mock renderer that records all draw calls for test assertions.
///
/// Coordinates are recorded after the active translation is applied.
pub struct MockRenderer {
    pub calls: Vec<DrawCall>,
    width: u32,
    height: u32,
    offsets: Vec<(i32, i32)>,
}

impl MockRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            calls: Vec::new(),
            width,
            height,
            offsets: Vec::new(),
        }
    }

    fn offset(&self) -> (i32, i32) {
        self.offsets.last().copied().unwrap_or((0, 0))
    }

    /// Check if any `DrawText` call contains the given substring.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// All drawn strings, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Position of the first `DrawText` containing `needle`.
    pub fn text_position(&self, needle: &str) -> Option<(i32, i32)> {
        self.calls.iter().find_map(|c| match c {
            DrawCall::DrawText { text, x, y, .. } if text.contains(needle) => Some((*x, *y)),
            _ => None,
        })
    }

    pub fn fill_rect_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. }))
            .count()
    }
}

impl Renderer for MockRenderer {
    fn init(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.calls.push(DrawCall::Clear(color));
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        let (dx, dy) = self.offset();
        self.calls.push(DrawCall::FillRect {
            x: x + dx,
            y: y + dy,
            w,
            h,
            color,
        });
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
        let (dx, dy) = self.offset();
        self.calls.push(DrawCall::DrawText {
            text: text.to_string(),
            x: x + dx,
            y: y + dy,
            font_size,
            color,
        });
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size: u16) -> u32 {
        crate::backend::bitmap_measure_text(text, font_size)
    }

    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.calls.push(DrawCall::Swap);
        Ok(())
    }

    fn push_translate(&mut self, dx: i32, dy: i32) -> Result<()> {
        let (ox, oy) = self.offset();
        self.offsets.push((ox + dx, oy + dy));
        self.calls.push(DrawCall::PushTranslate(dx, dy));
        Ok(())
    }

    fn pop_translate(&mut self) -> Result<()> {
        self.offsets.pop();
        self.calls.push(DrawCall::PopTranslate);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }

    fn push_rounded_clip(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _radius: u16) -> Result<()> {
        self.calls.push(DrawCall::PushClip);
        Ok(())
    }

    fn pop_clip(&mut self) -> Result<()> {
        self.calls.push(DrawCall::PopClip);
        Ok(())
    }

    fn vram_usage(&self) -> VramUsage {
        VramUsage {
            font_bytes: 1_500_000,
            texture_bytes: 2_000_000,
            texture_max_bytes: 8_000_000,
        }
    }
}

/// Shared, thread-safe hook log.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Drain the log.
pub fn take(log: &EventLog) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

/// A layer that appends `"<name>:<hook>"` to a shared log for every hook.
///
/// Renders its name as text so draw order can be checked on the renderer.
pub struct RecordingLayer {
    name: String,
    kind: LayerKind,
    log: EventLog,
    consume: bool,
    prompts: Vec<HelpPrompt>,
    processing: Arc<AtomicBool>,
}

impl RecordingLayer {
    pub fn new(name: &str, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            kind: LayerKind::Normal,
            log: Arc::clone(log),
            consume: false,
            prompts: Vec::new(),
            processing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_kind(mut self, kind: LayerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Consume every input event.
    pub fn consuming(mut self) -> Self {
        self.consume = true;
        self
    }

    pub fn with_prompts(mut self, prompts: Vec<HelpPrompt>) -> Self {
        self.prompts = prompts;
        self
    }

    /// Flag controlling `is_processing` after the layer is pushed.
    pub fn processing_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.processing)
    }

    fn record(&self, hook: &str) {
        self.log.lock().unwrap().push(format!("{}:{hook}", self.name));
    }
}

impl GuiLayer for RecordingLayer {
    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn input(&mut self, _config: &dyn InputConfig, _event: &InputEvent) -> bool {
        self.record("input");
        self.consume
    }

    fn text_input(&mut self, text: &str) {
        self.record(&format!("text={text}"));
    }

    fn update(&mut self, dt: u32) {
        self.record(&format!("update={dt}"));
    }

    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        self.record("render");
        renderer.draw_text(&self.name, 0, 0, 8, Color::WHITE)
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        self.prompts.clone()
    }

    fn set_top_window(&mut self, top: bool) {
        self.record(&format!("top={top}"));
    }

    fn set_opacity(&mut self, opacity: u8) {
        self.record(&format!("opacity={opacity}"));
    }

    fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    fn on_show(&mut self) {
        self.record("show");
    }

    fn on_hide(&mut self) {
        self.record("hide");
    }

    fn on_screensaver_activate(&mut self) {
        self.record("ss_on");
    }

    fn on_screensaver_deactivate(&mut self) {
        self.record("ss_off");
    }
}

/// Filter a log down to entries for one hook suffix.
pub fn entries_with(log: &[String], suffix: &str) -> Vec<String> {
    log.iter()
        .filter(|e| e.ends_with(suffix))
        .cloned()
        .collect()
}

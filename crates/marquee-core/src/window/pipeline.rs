//! The per-frame update and render pipelines.
//!
//! Both are an ordered list of named stages. Stage order is part of the
//! contract: later stages observe what earlier ones did in the same frame.

use crate::backend::Renderer;
use crate::config::keys;
use crate::error::Result;
use crate::overlay::InfoPopup;

use super::Window;

/// Update stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    /// Run callbacks posted from other threads.
    PostedWork,
    /// Turn a newly started track into a notification.
    NowPlaying,
    /// Promote at most one queued notification to the popup.
    Notifications,
    /// Apply a pending one-shot cap of `dt` to the running average.
    NormalizeDelta,
    Volume,
    /// Frame timing window and the debug readout.
    FrameStats,
    Clock,
    IdleTimer,
    /// Transition, active layer, screensaver, popup, indicators, audio.
    Components,
}

pub const UPDATE_PIPELINE: [UpdateStage; 9] = [
    UpdateStage::PostedWork,
    UpdateStage::NowPlaying,
    UpdateStage::Notifications,
    UpdateStage::NormalizeDelta,
    UpdateStage::Volume,
    UpdateStage::FrameStats,
    UpdateStage::Clock,
    UpdateStage::IdleTimer,
    UpdateStage::Components,
];

/// Render stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    /// Bottom layer, optional middle layer, dim overlay, top layer.
    GuiStack,
    HelpPrompts,
    /// Framerate readout, clock, controller activity, battery.
    InfoOverlays,
    /// Idle check that may start the screensaver.
    ScreenSaverStart,
    Popup,
    NotificationWidgets,
    /// Always runs so a fade-out can finish.
    ScreenSaver,
    ScreenExtras,
    VolumePopup,
    /// Idle check that may enter sleep.
    SleepCheck,
}

pub const RENDER_PIPELINE: [RenderStage; 10] = [
    RenderStage::GuiStack,
    RenderStage::HelpPrompts,
    RenderStage::InfoOverlays,
    RenderStage::ScreenSaverStart,
    RenderStage::Popup,
    RenderStage::NotificationWidgets,
    RenderStage::ScreenSaver,
    RenderStage::ScreenExtras,
    RenderStage::VolumePopup,
    RenderStage::SleepCheck,
];

impl Window {
    /// Advance one frame by `dt` milliseconds.
    pub fn update(&mut self, dt: u32) {
        self.sync_notification_default();
        let mut dt = dt;
        for stage in UPDATE_PIPELINE {
            dt = self.run_update_stage(stage, dt);
        }
    }

    /// Draw one frame. Does not present it; the caller swaps buffers.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        self.vram = renderer.vram_usage();
        let result = RENDER_PIPELINE
            .iter()
            .try_for_each(|&stage| self.run_render_stage(stage, renderer));
        // A failed frame must not suppress the next frame's help bar.
        self.rendered_help_early = false;
        result
    }

    /// Run one update stage; returns the (possibly normalized) delta for
    /// the stages that follow.
    pub(crate) fn run_update_stage(&mut self, stage: UpdateStage, dt: u32) -> u32 {
        match stage {
            UpdateStage::PostedWork => {
                for f in self.shared.posted.take() {
                    f(self);
                }
            },
            UpdateStage::NowPlaying => self.process_now_playing(),
            UpdateStage::Notifications => {
                if let Some(msg) = self.shared.notifications.pop_newest() {
                    log::debug!("Notification message: {}", msg.text);
                    self.popup = Some(InfoPopup::new(msg.text, msg.duration_ms));
                }
            },
            UpdateStage::NormalizeDelta => return self.frame_stats.normalize(dt),
            UpdateStage::Volume => {
                if let Some(audio) = &self.audio {
                    self.volume.update(dt, audio.volume());
                }
            },
            UpdateStage::FrameStats => {
                let draw = self.settings.get_bool(keys::DRAW_FRAMERATE);
                self.frame_stats.record(dt, draw, self.vram);
            },
            UpdateStage::Clock => {
                if self.settings.get_bool(keys::DRAW_CLOCK) {
                    self.clock.update(dt, self.time.as_ref());
                }
            },
            UpdateStage::IdleTimer => self.idle.advance(dt),
            UpdateStage::Components => self.update_components(dt),
        }
        dt
    }

    fn process_now_playing(&mut self) {
        if !self.settings.get_bool(keys::DISPLAY_TITLES) {
            return;
        }
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        if let Some(name) = audio.song_name().filter(|n| !n.is_empty()) {
            self.shared.notify(format!("Now playing: {name}"), 0);
            audio.clear_song_name();
        }
    }

    fn update_components(&mut self, dt: u32) {
        self.update_transition(dt);
        if let Some(top) = self.stack.top_mut() {
            top.update(dt);
        }
        if let Some(saver) = self.screensaver.as_mut() {
            saver.update(dt);
        }
        if let Some(popup) = self.popup.as_mut() {
            popup.update(dt);
            if popup.is_expired() {
                self.popup = None;
            }
        }
        self.activity.update(dt);
        if self.settings.get_bool(keys::SHOW_BATTERY) {
            self.battery.update(dt, self.power.as_ref());
        }
        if let Some(audio) = self.audio.as_mut() {
            audio.update(dt);
        }
    }

    fn update_transition(&mut self, dt: u32) {
        let Some(mut transition) = self.transition.take() else {
            return;
        };
        transition.elapsed_ms = transition.elapsed_ms.saturating_add(dt);
        let shown = (255.0 * transition.progress()) as u8;
        let done = transition.is_done();

        if let Some(leaving) = self.stack.get_mut(transition.leaving) {
            leaving.update(dt);
            leaving.set_opacity(if done { 255 } else { 255 - shown });
        }
        if let Some(top) = self.stack.top_mut() {
            top.set_opacity(if done { 255 } else { shown });
        }
        if !done {
            self.transition = Some(transition);
        }
    }

    pub(crate) fn run_render_stage(
        &mut self,
        stage: RenderStage,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let compact = self.stack.len() >= 2 && renderer.is_small_screen();
        match stage {
            RenderStage::GuiStack => self.render_stack(renderer)?,
            RenderStage::HelpPrompts => {
                if !compact && !self.rendered_help_early {
                    self.help.render(renderer)?;
                }
            },
            RenderStage::InfoOverlays => {
                if self.settings.get_bool(keys::DRAW_FRAMERATE) {
                    self.frame_stats.render(renderer)?;
                }
                if !compact {
                    if self.settings.get_bool(keys::DRAW_CLOCK) {
                        self.clock.render(renderer)?;
                    }
                    if self.settings.get_bool(keys::SHOW_CONTROLLER_ACTIVITY) {
                        self.activity.render(renderer)?;
                    }
                    if self.settings.get_bool(keys::SHOW_BATTERY) {
                        self.battery.render(renderer)?;
                    }
                }
            },
            RenderStage::ScreenSaverStart => self.check_screensaver(),
            RenderStage::Popup => {
                if !self.idle.screensaver_running
                    && let Some(popup) = &self.popup
                {
                    popup.render(renderer)?;
                }
            },
            RenderStage::NotificationWidgets => self.render_widgets(renderer)?,
            RenderStage::ScreenSaver => {
                if let Some(saver) = self.screensaver.as_mut() {
                    saver.render(renderer)?;
                }
            },
            RenderStage::ScreenExtras => {
                for extra in &mut self.extras {
                    extra.render(renderer)?;
                }
            },
            RenderStage::VolumePopup => {
                if self.settings.get_bool(keys::VOLUME_POPUP) {
                    self.volume.render(renderer)?;
                }
            },
            RenderStage::SleepCheck => self.check_sleep(),
        }
        Ok(())
    }

    /// Bottom layer always; when a distinct top exists, the middle layer
    /// under dialogs, the background fade, then the top (sliding in if a
    /// transition runs).
    fn render_stack(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let len = self.stack.len();
        let Some(bottom) = self.stack.at_mut(0) else {
            return Ok(());
        };
        bottom.render(renderer)?;
        if len < 2 {
            return Ok(());
        }

        let top_kind = self.stack.top().map(|t| t.kind()).unwrap_or_default();
        if self.transition.is_none() && top_kind.shows_layer_beneath() && len > 2 {
            if let Some(middle) = self.stack.at_mut(len - 2) {
                middle.render(renderer)?;
            }
        }

        let (sw, sh) = renderer.screen_size();
        renderer.fill_rect(0, 0, sw, sh, self.theme.background.fade_color)?;

        match self.transition {
            Some(transition) => {
                let offset = (sw as f32 * transition.progress()) as i32;
                if let Some(leaving) = self.stack.get_mut(transition.leaving) {
                    renderer.push_translate(-offset, 0)?;
                    leaving.render(renderer)?;
                    renderer.pop_translate()?;
                }
                if let Some(top) = self.stack.top_mut() {
                    renderer.push_translate(sw as i32 - offset, 0)?;
                    top.render(renderer)?;
                    renderer.pop_translate()?;
                }
            },
            None => {
                if let Some(top) = self.stack.top_mut() {
                    top.render(renderer)?;
                }
            },
        }
        Ok(())
    }

    /// Persistent widgets stacked down the top-right corner.
    fn render_widgets(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let widgets = self.shared.widgets.snapshot();
        if widgets.is_empty() {
            return Ok(());
        }
        let (sw, sh) = renderer.screen_size();
        let spacing = (sw as f32 * 0.01) as i32;
        let mut y = (sh as f32 * 0.02) as i32;
        for widget in widgets {
            let (w, h) = widget.size(renderer);
            let x = (sw as f32 * 0.99) as i32 - w as i32;
            widget.render(renderer, x, y)?;
            y += h as i32 + spacing;
        }
        Ok(())
    }
}

//! The presentation controller.
//!
//! [`Window`] owns the GUI stack, the status overlays, the help strip and
//! the idle state machine, and runs the per-frame pipelines. It lives on one
//! thread; other threads reach it through a [`WindowHandle`].

mod idle;
mod input;
mod pipeline;
mod queue;
mod stack;


use std::sync::Arc;

pub use idle::PowerState;
pub use input::InputDisposition;
pub use pipeline::{RENDER_PIPELINE, RenderStage, UPDATE_PIPELINE, UpdateStage};
pub use queue::{NotificationMessage, WindowHandle, resolve_duration};
pub use stack::GuiStack;

use crate::backend::{Renderer, VramUsage};
use crate::config::{MarqueeConfig, Settings, keys};
use crate::error::Result;
use crate::help::{HelpBar, HelpPrompt, HelpStyle, aggregate_prompts};
use crate::layer::{GuiLayer, LayerId};
use crate::overlay::{
    BatteryIndicator, ClockOverlay, ControllerActivity, FONT_SMALL, FrameStats, InfoPopup, Splash,
    VolumeInfo,
};
use crate::platform::{DesktopPlatform, PowerService, TimeService};
use crate::services::{AudioService, EventHook, LogEventHook, NotificationWidget, ScreenSaver};
use crate::theme::ScreenTheme;

use idle::IdleTracker;
use queue::Shared;
use stack::Transition;

/// Top-level presentation controller.
pub struct Window {
    settings: Settings,
    title: String,
    screen: (u32, u32),
    stack: GuiStack,
    transition: Option<Transition>,
    shared: Arc<Shared>,

    help: HelpBar,
    rendered_help_early: bool,
    theme: ScreenTheme,
    extras: Vec<Box<dyn GuiLayer>>,

    clock: ClockOverlay,
    battery: BatteryIndicator,
    activity: ControllerActivity,
    volume: VolumeInfo,
    frame_stats: FrameStats,
    popup: Option<InfoPopup>,
    splash: Option<Splash>,
    vram: VramUsage,

    idle: IdleTracker,
    screensaver: Option<Box<dyn ScreenSaver>>,
    audio: Option<Box<dyn AudioService>>,
    hook: Box<dyn EventHook>,
    time: Box<dyn TimeService>,
    power: Box<dyn PowerService>,
}

impl Window {
    pub fn new(config: MarqueeConfig) -> Self {
        let shared = Arc::new(Shared::default());
        shared.set_default_secs(config.settings.get_int(keys::DISPLAY_TITLES_TIME));
        Self {
            screen: (config.window.width, config.window.height),
            title: config.window.title,
            settings: config.settings,
            stack: GuiStack::new(),
            transition: None,
            shared,
            help: HelpBar::new(),
            rendered_help_early: false,
            theme: ScreenTheme::default(),
            extras: Vec::new(),
            clock: ClockOverlay::new(),
            battery: BatteryIndicator::new(),
            activity: ControllerActivity::new(),
            volume: VolumeInfo::new(),
            frame_stats: FrameStats::new(),
            popup: None,
            splash: None,
            vram: VramUsage::default(),
            idle: IdleTracker::default(),
            screensaver: None,
            audio: None,
            hook: Box::new(LogEventHook),
            time: Box::new(DesktopPlatform::new()),
            power: Box::new(DesktopPlatform::new()),
        }
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioService>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_event_hook(mut self, hook: Box<dyn EventHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn with_time_service(mut self, time: Box<dyn TimeService>) -> Self {
        self.time = time;
        self
    }

    pub fn with_power_service(mut self, power: Box<dyn PowerService>) -> Self {
        self.power = power;
        self
    }

    pub fn with_screensaver(mut self, screensaver: Box<dyn ScreenSaver>) -> Self {
        self.screensaver = Some(screensaver);
        self
    }

    /// Replace the screensaver. A running one is stopped first.
    pub fn set_screensaver(&mut self, screensaver: Option<Box<dyn ScreenSaver>>) {
        self.cancel_screensaver();
        self.screensaver = screensaver;
    }

    /// A cloneable, thread-safe handle for worker threads.
    pub fn handle(&self) -> WindowHandle {
        WindowHandle::new(Arc::clone(&self.shared))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Bring up the renderer. Failure here is fatal for the caller.
    pub fn init(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let (w, h) = self.screen;
        if let Err(e) = renderer.init(w, h) {
            log::error!("Renderer failed to initialize: {e}");
            return Err(e);
        }
        self.screen = renderer.screen_size();
        self.volume.reset();
        self.refresh_help();
        log::info!("{} initialized at {}x{}", self.title, self.screen.0, self.screen.1);
        Ok(())
    }

    /// Hide everything and shut the renderer down.
    pub fn deinit(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        for extra in &mut self.extras {
            extra.on_hide();
        }
        self.stack.for_each_mut(|l| l.on_hide());
        renderer.shutdown()
    }

    /// Show everything again after [`deinit`](Self::deinit) and a fresh
    /// [`init`](Self::init).
    pub fn reactivate_gui(&mut self) {
        for extra in &mut self.extras {
            extra.on_show();
        }
        self.stack.for_each_mut(|l| l.on_show());
        self.refresh_help();
    }

    // -----------------------------------------------------------------------
    // GUI stack
    // -----------------------------------------------------------------------

    /// Push a layer on top. Cancels any running transition.
    pub fn push(&mut self, layer: Box<dyn GuiLayer>) -> LayerId {
        self.finish_transition();
        let id = self.stack.push(layer);
        self.refresh_help();
        id
    }

    /// Push a layer that slides in from the right over `duration_ms` while
    /// the previous top slides out. The slide only runs when the previous
    /// top is above the bottom layer; otherwise this is a plain push.
    pub fn push_with_transition(&mut self, layer: Box<dyn GuiLayer>, duration_ms: u32) -> LayerId {
        let leaving = if self.stack.len() >= 2 && duration_ms > 0 {
            self.stack.peek()
        } else {
            None
        };
        let id = self.push(layer);
        if let Some(leaving) = leaving {
            if let Some(top) = self.stack.top_mut() {
                top.set_opacity(0);
            }
            self.transition = Some(Transition::new(leaving, duration_ms));
        }
        id
    }

    /// Remove a layer and hand it back. Unknown ids are a no-op.
    pub fn remove(&mut self, id: LayerId) -> Option<Box<dyn GuiLayer>> {
        if self
            .transition
            .is_some_and(|t| t.leaving == id || self.stack.peek() == Some(id))
        {
            self.finish_transition();
        }
        let was_top = self.stack.peek() == Some(id);
        let layer = self.stack.remove(id)?;
        if was_top {
            self.refresh_help();
        }
        Some(layer)
    }

    /// The active (topmost) layer.
    pub fn peek(&self) -> Option<LayerId> {
        self.stack.peek()
    }

    pub fn layer(&self, id: LayerId) -> Option<&dyn GuiLayer> {
        self.stack.get(id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut dyn GuiLayer> {
        self.stack.get_mut(id)
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// `true` if any stacked layer is mid-operation.
    pub fn is_processing(&self) -> bool {
        self.stack.any_processing()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    fn finish_transition(&mut self) {
        let Some(transition) = self.transition.take() else {
            return;
        };
        if let Some(leaving) = self.stack.get_mut(transition.leaving) {
            leaving.set_opacity(255);
        }
        if let Some(top) = self.stack.top_mut() {
            top.set_opacity(255);
        }
    }

    // -----------------------------------------------------------------------
    // Help
    // -----------------------------------------------------------------------

    /// Show `prompts` (aggregated) in the help strip. Also schedules a clock
    /// refresh so both update together.
    pub fn set_help_prompts(&mut self, prompts: &[HelpPrompt], style: HelpStyle) {
        self.help.set(aggregate_prompts(prompts), style);
        self.clock.force_refresh();
    }

    pub fn help_prompts(&self) -> &[HelpPrompt] {
        self.help.prompts()
    }

    /// Draw the help strip now, e.g. beneath a full-screen overlay; the
    /// following [`render`](Self::render) skips it.
    pub fn render_help_prompts_early(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        self.help.render(renderer)?;
        self.rendered_help_early = true;
        Ok(())
    }

    fn refresh_help(&mut self) {
        let Some(top) = self.stack.top() else {
            self.help.clear();
            return;
        };
        let prompts = top.help_prompts();
        let style = top.help_style().unwrap_or_else(|| self.theme.help_style());
        self.set_help_prompts(&prompts, style);
    }

    // -----------------------------------------------------------------------
    // Notifications and deferred work
    // -----------------------------------------------------------------------

    /// Queue a transient popup. `duration_ms <= 0` uses the current
    /// `audio.display_titles_time`.
    pub fn display_notification_message(&self, text: impl Into<String>, duration_ms: i32) {
        self.sync_notification_default();
        self.shared.notify(text.into(), duration_ms);
    }

    /// Publish the configured popup time to handles on other threads.
    fn sync_notification_default(&self) {
        self.shared
            .set_default_secs(self.settings.get_int(keys::DISPLAY_TITLES_TIME));
    }

    /// See [`WindowHandle::post_to_ui_thread`].
    pub fn post_to_ui_thread<F>(&self, f: F)
    where
        F: FnOnce(&mut Window) + Send + 'static,
    {
        self.shared.posted.post(Box::new(f));
    }

    pub fn register_notification_component(&self, widget: Arc<dyn NotificationWidget>) {
        self.shared.widgets.register(widget);
    }

    pub fn unregister_notification_component(&self, widget: &Arc<dyn NotificationWidget>) {
        self.shared.widgets.unregister(widget);
    }

    /// The transient popup currently shown.
    pub fn popup(&self) -> Option<&InfoPopup> {
        self.popup.as_ref()
    }

    /// Close the transient popup early.
    pub fn stop_info_popup(&mut self) {
        self.popup = None;
    }

    // -----------------------------------------------------------------------
    // Misc
    // -----------------------------------------------------------------------

    /// Cap the next update's delta to the running average frame time.
    pub fn normalize_next_update(&mut self) {
        self.frame_stats.normalize_next_update();
    }

    pub fn clock_text(&self) -> Option<&str> {
        self.clock.text()
    }

    /// Draw and present a loading screen outside the frame loop.
    pub fn render_loading_screen(
        &mut self,
        renderer: &mut dyn Renderer,
        text: &str,
        percent: Option<f32>,
        opacity: u8,
    ) -> Result<()> {
        let title = &self.title;
        self.splash
            .get_or_insert_with(|| Splash::new(title.clone()))
            .render(renderer, text, percent, opacity)
    }

    /// Drop the loading screen resources.
    pub fn end_render_loading_screen(&mut self) {
        self.splash = None;
    }

    /// Rebuild theme-driven overlays.
    pub fn on_theme_changed(&mut self, theme: ScreenTheme) {
        self.extras = theme.build_extras();
        let (color, font_size) = theme.clock_style(FONT_SMALL);
        self.clock.set_style(color, font_size);
        self.activity.apply_theme(theme.controller_activity.as_ref());
        self.battery.apply_theme(theme.battery_indicator.as_ref());
        self.volume = VolumeInfo::new();
        self.theme = theme;
        self.refresh_help();
        log::debug!("Screen theme applied with {} extras", self.extras.len());
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("screen", &self.screen)
            .field("stack", &self.stack)
            .field("state", &self.idle.state())
            .finish_non_exhaustive()
    }
}

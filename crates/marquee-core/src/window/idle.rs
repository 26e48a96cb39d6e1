//! Idle tracking and the screensaver/sleep transitions.

use crate::config::keys;

use super::Window;

/// Where the idle state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Active,
    ScreensaverRunning,
    Asleep,
}

/// Controller-thread idle bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct IdleTracker {
    since_input_ms: u64,
    pub screensaver_running: bool,
    pub sleeping: bool,
    pub allow_sleep: bool,
}

impl Default for IdleTracker {
    fn default() -> Self {
        Self {
            since_input_ms: 0,
            screensaver_running: false,
            sleeping: false,
            allow_sleep: true,
        }
    }
}

impl IdleTracker {
    pub fn reset(&mut self) {
        self.since_input_ms = 0;
    }

    pub fn advance(&mut self, dt: u32) {
        self.since_input_ms = self.since_input_ms.saturating_add(dt as u64);
    }

    pub fn since_input_ms(&self) -> u64 {
        self.since_input_ms
    }

    /// A threshold of zero (or less) disables idle handling.
    pub fn threshold_reached(&self, threshold_ms: i64) -> bool {
        threshold_ms > 0 && self.since_input_ms >= threshold_ms as u64
    }

    pub fn state(&self) -> PowerState {
        if self.sleeping {
            PowerState::Asleep
        } else if self.screensaver_running {
            PowerState::ScreensaverRunning
        } else {
            PowerState::Active
        }
    }
}

impl Window {
    fn idle_threshold_reached(&self) -> bool {
        self.idle
            .threshold_reached(self.settings.get_int(keys::SCREENSAVER_TIME))
    }

    /// Start the screensaver if one is installed and not already running.
    pub(crate) fn start_screensaver(&mut self) {
        if self.idle.screensaver_running {
            return;
        }
        let Some(saver) = self.screensaver.as_mut() else {
            return;
        };
        for extra in &mut self.extras {
            extra.on_screensaver_activate();
        }
        self.stack.for_each_mut(|l| l.on_screensaver_activate());
        saver.start();
        self.idle.screensaver_running = true;
        log::debug!("Screensaver started after {} ms idle", self.idle.since_input_ms());
    }

    /// Stop a running screensaver. Returns `true` if one was stopped.
    pub(crate) fn cancel_screensaver(&mut self) -> bool {
        if !self.idle.screensaver_running {
            return false;
        }
        let Some(saver) = self.screensaver.as_mut() else {
            self.idle.screensaver_running = false;
            return false;
        };
        saver.stop();
        saver.reset_counts();
        self.idle.screensaver_running = false;
        self.stack.for_each_mut(|l| l.on_screensaver_deactivate());
        for extra in &mut self.extras {
            extra.on_screensaver_deactivate();
        }
        log::debug!("Screensaver stopped");
        true
    }

    /// Render-time check that may start the screensaver.
    pub(crate) fn check_screensaver(&mut self) {
        if self.idle_threshold_reached() {
            self.start_screensaver();
        }
    }

    /// Render-time check that may put the system to sleep.
    pub(crate) fn check_sleep(&mut self) {
        if !self.idle_threshold_reached() || self.idle.sleeping {
            return;
        }
        let saver_allows = self.screensaver.as_ref().is_none_or(|s| s.allow_sleep());
        if self.is_processing() || !self.idle.allow_sleep || !saver_allows {
            return;
        }
        self.idle.sleeping = true;
        self.idle.reset();
        log::info!("Going to sleep");
        self.hook.fire_event("sleep");
    }

    /// Leave sleep on input. Fires the wake hook.
    pub(crate) fn wake(&mut self) {
        self.idle.reset();
        self.cancel_screensaver();
        self.idle.sleeping = false;
        log::info!("Waking up");
        self.hook.fire_event("wake");
    }

    pub fn power_state(&self) -> PowerState {
        self.idle.state()
    }

    /// Milliseconds since the last input.
    pub fn idle_ms(&self) -> u64 {
        self.idle.since_input_ms()
    }

    /// Allow or forbid sleep (e.g. during a long-running job).
    pub fn set_allow_sleep(&mut self, allow: bool) {
        self.idle.allow_sleep = allow;
    }

    pub fn allow_sleep(&self) -> bool {
        self.idle.allow_sleep
    }
}

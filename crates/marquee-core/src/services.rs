//! Collaborator traits the controller talks to.
//!
//! Audio, scripting and screensaver engines live outside this crate; the
//! window only needs the narrow slices defined here.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::backend::Renderer;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// The audio subsystem as seen by the controller.
pub trait AudioService {
    /// Title of the track that just started, if not yet announced.
    fn song_name(&self) -> Option<String>;

    /// Mark the current title as announced.
    fn clear_song_name(&mut self);

    /// Master volume, 0-100.
    fn volume(&self) -> u8;

    /// Periodic tick, called last in every update.
    fn update(&mut self, dt: u32) {
        let _ = dt;
    }
}

/// Audio state shared with a playback thread.
///
/// The playback side calls [`set_song_name`](Self::set_song_name) and
/// [`set_volume`](Self::set_volume) from any thread; the controller reads it
/// through [`AudioService`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct SharedAudioState {
    song: Arc<Mutex<Option<String>>>,
    volume: Arc<AtomicU8>,
}

impl SharedAudioState {
    pub fn new(volume: u8) -> Self {
        Self {
            song: Arc::new(Mutex::new(None)),
            volume: Arc::new(AtomicU8::new(volume.min(100))),
        }
    }

    pub fn set_song_name(&self, name: &str) {
        let mut song = self.song.lock().unwrap_or_else(PoisonError::into_inner);
        *song = (!name.is_empty()).then(|| name.to_string());
    }

    pub fn set_volume(&self, volume: u8) {
        self.volume.store(volume.min(100), Ordering::Relaxed);
    }
}

impl AudioService for SharedAudioState {
    fn song_name(&self) -> Option<String> {
        self.song
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear_song_name(&mut self) {
        *self.song.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Scripting hook
// ---------------------------------------------------------------------------

/// Named-event sink (`"sleep"`, `"wake"`).
pub trait EventHook {
    fn fire_event(&mut self, name: &str);
}

/// Event hook that only logs. Used when no scripting engine is attached.
#[derive(Debug, Default)]
pub struct LogEventHook;

impl EventHook for LogEventHook {
    fn fire_event(&mut self, name: &str) {
        log::info!("Event: {name}");
    }
}

// ---------------------------------------------------------------------------
// Screensaver
// ---------------------------------------------------------------------------

/// A screensaver engine.
pub trait ScreenSaver {
    fn start(&mut self);

    fn stop(&mut self);

    /// Reset per-session counters after a stop.
    fn reset_counts(&mut self) {}

    fn update(&mut self, dt: u32);

    /// Called every frame, active or not, so a fade-out can finish.
    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()>;

    /// Whether the system may go to sleep while this screensaver runs.
    fn allow_sleep(&self) -> bool {
        true
    }

    /// `true` when the saver is showing content that can be launched.
    fn has_current_content(&self) -> bool {
        false
    }

    /// Skip to the next piece of content.
    fn next_content(&mut self) {}

    /// Launch the content currently shown.
    fn launch_content(&mut self) {}
}

// ---------------------------------------------------------------------------
// Persistent notification widgets
// ---------------------------------------------------------------------------

/// A long-lived overlay drawn every frame in the top-right stack
/// (e.g. a download progress indicator).
///
/// Widgets are shared with the threads that update them, so they are
/// `Send + Sync` and draw through `&self`.
pub trait NotificationWidget: Send + Sync {
    /// Width and height the widget will occupy.
    fn size(&self, renderer: &dyn Renderer) -> (u32, u32);

    /// Draw with the top-left corner at `(x, y)`.
    fn render(&self, renderer: &mut dyn Renderer, x: i32, y: i32) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_audio_state_is_shared_across_clones() {
        let producer = SharedAudioState::new(50);
        let mut consumer = producer.clone();
        assert_eq!(consumer.song_name(), None);

        producer.set_song_name("Green Hill Zone");
        assert_eq!(consumer.song_name().as_deref(), Some("Green Hill Zone"));

        consumer.clear_song_name();
        assert_eq!(producer.song_name(), None);
    }

    #[test]
    fn empty_song_name_reads_as_none() {
        let state = SharedAudioState::new(0);
        state.set_song_name("");
        assert_eq!(state.song_name(), None);
    }

    #[test]
    fn volume_is_clamped() {
        let state = SharedAudioState::new(250);
        assert_eq!(state.volume(), 100);
        state.set_volume(30);
        assert_eq!(state.volume(), 30);
    }

    #[test]
    fn producer_on_another_thread() {
        let state = SharedAudioState::new(10);
        let producer = state.clone();
        std::thread::spawn(move || producer.set_song_name("Track 1"))
            .join()
            .unwrap();
        assert_eq!(state.song_name().as_deref(), Some("Track 1"));
    }
}

//! Background job that reports through the window handle.
//!
//! Stands in for a scraper or updater: it shows a progress widget, changes
//! the audio state, and finishes with a notification.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use marquee_core::WindowHandle;
use marquee_core::overlay::ProgressNotification;
use marquee_core::services::{NotificationWidget, SharedAudioState};

/// Worker pacing.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPlan {
    pub steps: u8,
    pub step_delay: Duration,
}

impl Default for WorkerPlan {
    fn default() -> Self {
        Self {
            steps: 10,
            step_delay: Duration::from_millis(150),
        }
    }
}

/// Run the fake scrape on its own thread.
pub fn spawn(
    handle: WindowHandle,
    audio: SharedAudioState,
    plan: WorkerPlan,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("scraper".into())
        .spawn(move || run(&handle, &audio, plan))
}

fn run(handle: &WindowHandle, audio: &SharedAudioState, plan: WorkerPlan) {
    let progress = Arc::new(ProgressNotification::new("Scraping"));
    let widget: Arc<dyn NotificationWidget> = Arc::<ProgressNotification>::clone(&progress);
    handle.register_notification_component(Arc::clone(&widget));
    audio.set_song_name("Title Theme");

    let steps = plan.steps.max(1);
    for step in 1..=steps {
        thread::sleep(plan.step_delay);
        let percent = (step as u32 * 100 / steps as u32) as u8;
        progress.set_percent(percent);
        progress.set_title(format!("Scraping {step}/{steps}"));
        log::debug!("Scrape progress {percent}%");
        if step == steps / 2 {
            audio.set_volume(70);
        }
    }

    handle.unregister_notification_component(&widget);
    handle.display_notification_message("Scrape complete", 0);
    log::info!("Worker finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::Window;
    use marquee_core::config::MarqueeConfig;
    use marquee_core::services::AudioService;

    #[test]
    fn worker_reports_and_cleans_up() {
        let mut w = Window::new(MarqueeConfig::default());
        let audio = SharedAudioState::new(50);
        let plan = WorkerPlan {
            steps: 2,
            step_delay: Duration::from_millis(1),
        };
        let join = spawn(w.handle(), audio.clone(), plan).unwrap();
        join.join().unwrap();

        assert_eq!(audio.volume(), 70);
        assert_eq!(audio.song_name().as_deref(), Some("Title Theme"));

        w.update(16);
        let popup = w.popup().unwrap();
        assert_eq!(popup.message(), "Scrape complete");
        assert_eq!(popup.duration_ms(), 10_000);
    }
}

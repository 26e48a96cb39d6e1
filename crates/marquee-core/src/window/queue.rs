//! Cross-thread handoff: deferred work, notification messages, and the
//! persistent notification widget registry.
//!
//! Each queue has its own lock. Locks are held only while the queue itself is
//! mutated; callbacks and widget rendering run after the lock is released.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::services::NotificationWidget;

use super::Window;

/// Fallback popup time when the configured value is out of range.
const FALLBACK_DURATION_SECS: i64 = 10;

/// A callback run once on the controller thread.
pub(crate) type PostedFn = Box<dyn FnOnce(&mut Window) + Send>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Effective display time for a notification.
///
/// A positive request is used as-is. Otherwise the configured seconds apply,
/// replaced by 10 s when they are `<= 2` or `> 120`.
pub fn resolve_duration(requested_ms: i32, configured_secs: i64) -> u32 {
    if requested_ms > 0 {
        return requested_ms as u32;
    }
    let secs = if configured_secs <= 2 || configured_secs > 120 {
        FALLBACK_DURATION_SECS
    } else {
        configured_secs
    };
    (secs * 1000) as u32
}

// ---------------------------------------------------------------------------
// Deferred work
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct PostedQueue {
    pending: Mutex<Vec<PostedFn>>,
}

impl PostedQueue {
    pub fn post(&self, f: PostedFn) {
        lock(&self.pending).push(f);
    }

    /// Take the whole batch, leaving the queue empty for re-entrant posts.
    pub fn take(&self) -> Vec<PostedFn> {
        std::mem::take(&mut *lock(&self.pending))
    }

    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }
}

// ---------------------------------------------------------------------------
// Notification messages
// ---------------------------------------------------------------------------

/// A transient message waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
    pub duration_ms: u32,
}

#[derive(Default)]
pub(crate) struct NotificationQueue {
    pending: Mutex<Vec<NotificationMessage>>,
}

impl NotificationQueue {
    /// Queue `text`, fixing its display time now: a non-positive request
    /// takes `configured_secs`.
    pub fn push(&self, text: String, requested_ms: i32, configured_secs: i64) {
        let duration_ms = resolve_duration(requested_ms, configured_secs);
        lock(&self.pending).push(NotificationMessage { text, duration_ms });
    }

    /// Newest pending message. Under backlog messages come out in reverse
    /// arrival order.
    pub fn pop_newest(&self) -> Option<NotificationMessage> {
        lock(&self.pending).pop()
    }

    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }
}

// ---------------------------------------------------------------------------
// Persistent widgets
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct WidgetRegistry {
    widgets: Mutex<Vec<Arc<dyn NotificationWidget>>>,
}

impl WidgetRegistry {
    /// Add a widget. Registering the same widget twice is a no-op.
    pub fn register(&self, widget: Arc<dyn NotificationWidget>) {
        let mut widgets = lock(&self.widgets);
        if !widgets.iter().any(|w| Arc::ptr_eq(w, &widget)) {
            widgets.push(widget);
        }
    }

    /// Remove a widget. Absent widgets are ignored.
    pub fn unregister(&self, widget: &Arc<dyn NotificationWidget>) {
        lock(&self.widgets).retain(|w| !Arc::ptr_eq(w, widget));
    }

    /// Current widgets in registration order.
    pub fn snapshot(&self) -> Vec<Arc<dyn NotificationWidget>> {
        lock(&self.widgets).iter().map(Arc::clone).collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.widgets).len()
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct Shared {
    pub posted: PostedQueue,
    pub notifications: NotificationQueue,
    pub widgets: WidgetRegistry,
    /// Last synced `audio.display_titles_time`, for enqueues off the
    /// controller thread.
    default_secs: AtomicI64,
}

impl Shared {
    pub fn set_default_secs(&self, secs: i64) {
        self.default_secs.store(secs, Ordering::Relaxed);
    }

    /// Queue a message against the last synced default display time.
    pub fn notify(&self, text: String, requested_ms: i32) {
        let secs = self.default_secs.load(Ordering::Relaxed);
        self.notifications.push(text, requested_ms, secs);
    }
}

/// Thread-safe entry point into a [`Window`].
///
/// Worker threads (audio callbacks, loaders, scrapers) hold a clone and
/// hand work to the controller thread through it. Nothing posted here is
/// acted on before the next [`Window::update`].
#[derive(Clone)]
pub struct WindowHandle {
    shared: Arc<Shared>,
}

impl WindowHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Run `f` on the controller thread during the next update. Callbacks
    /// run in the order they were posted, exactly once.
    pub fn post_to_ui_thread<F>(&self, f: F)
    where
        F: FnOnce(&mut Window) + Send + 'static,
    {
        self.shared.posted.post(Box::new(f));
    }

    /// Queue a transient popup. `duration_ms <= 0` uses the configured
    /// default (`audio.display_titles_time`) as of the last update.
    pub fn display_notification_message(&self, text: impl Into<String>, duration_ms: i32) {
        self.shared.notify(text.into(), duration_ms);
    }

    pub fn register_notification_component(&self, widget: Arc<dyn NotificationWidget>) {
        self.shared.widgets.register(widget);
    }

    pub fn unregister_notification_component(&self, widget: &Arc<dyn NotificationWidget>) {
        self.shared.widgets.unregister(widget);
    }
}

impl std::fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHandle")
            .field("posted", &self.shared.posted.len())
            .field("notifications", &self.shared.notifications.len())
            .field("widgets", &self.shared.widgets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Renderer;
    use crate::error::Result;

    struct Dot;

    impl NotificationWidget for Dot {
        fn size(&self, _renderer: &dyn Renderer) -> (u32, u32) {
            (4, 4)
        }

        fn render(&self, _renderer: &mut dyn Renderer, _x: i32, _y: i32) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn explicit_duration_is_kept() {
        assert_eq!(resolve_duration(1500, 30), 1500);
    }

    #[test]
    fn default_duration_uses_configured_seconds() {
        assert_eq!(resolve_duration(0, 5), 5000);
        assert_eq!(resolve_duration(-20, 120), 120_000);
        assert_eq!(resolve_duration(0, 3), 3000);
    }

    #[test]
    fn out_of_range_default_falls_back_to_ten_seconds() {
        assert_eq!(resolve_duration(0, 2), 10_000);
        assert_eq!(resolve_duration(0, 0), 10_000);
        assert_eq!(resolve_duration(0, -7), 10_000);
        assert_eq!(resolve_duration(0, 121), 10_000);
    }

    #[test]
    fn notifications_pop_newest_first() {
        let q = NotificationQueue::default();
        q.push("A".into(), 100, 10);
        q.push("B".into(), 100, 10);
        q.push("C".into(), 100, 10);
        let order: Vec<String> = std::iter::from_fn(|| q.pop_newest())
            .map(|m| m.text)
            .collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[test]
    fn duration_resolved_on_push() {
        let q = NotificationQueue::default();
        q.push("x".into(), 0, 4);
        q.push("y".into(), 750, 4);
        q.push("z".into(), -1, 60);
        assert_eq!(q.pop_newest().unwrap().duration_ms, 60_000);
        assert_eq!(q.pop_newest().unwrap().duration_ms, 750);
        assert_eq!(q.pop_newest().unwrap().duration_ms, 4000);
        assert_eq!(q.pop_newest(), None);
    }

    #[test]
    fn handle_uses_synced_default() {
        let shared = Arc::new(Shared::default());
        let handle = WindowHandle::new(Arc::clone(&shared));
        shared.set_default_secs(7);
        handle.display_notification_message("a", 0);
        shared.set_default_secs(30);
        handle.display_notification_message("b", 0);
        handle.display_notification_message("c", 250);
        let durations: Vec<u32> = std::iter::from_fn(|| shared.notifications.pop_newest())
            .map(|m| m.duration_ms)
            .collect();
        assert_eq!(durations, vec![250, 30_000, 7000]);
    }

    #[test]
    fn posted_take_empties_queue() {
        let q = PostedQueue::default();
        q.post(Box::new(|_| {}));
        q.post(Box::new(|_| {}));
        assert_eq!(q.take().len(), 2);
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn registry_is_idempotent() {
        let reg = WidgetRegistry::default();
        let a: Arc<dyn NotificationWidget> = Arc::new(Dot);
        let b: Arc<dyn NotificationWidget> = Arc::new(Dot);
        reg.register(Arc::clone(&a));
        reg.register(Arc::clone(&a));
        reg.register(Arc::clone(&b));
        assert_eq!(reg.len(), 2);

        reg.unregister(&a);
        reg.unregister(&a);
        assert_eq!(reg.len(), 1);
        assert!(Arc::ptr_eq(&reg.snapshot()[0], &b));
    }

    #[test]
    fn handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<WindowHandle>();
    }

    #[test]
    fn producers_on_many_threads() {
        let shared = Arc::new(Shared::default());
        let handle = WindowHandle::new(Arc::clone(&shared));
        let threads: Vec<_> = (0..4)
            .map(|i| {
                let h = handle.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        h.display_notification_message(format!("{i}-{j}"), 1000);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(shared.notifications.len(), 100);
    }
}

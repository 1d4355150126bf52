//! Bounded notification queue between UI-thread producers and the
//! connection writer.
//!
//! Watch callbacks and the binding-trace sink push from the UI thread;
//! the server's connection loop awaits [`Notifier::next`]. The queue is
//! bounded and drops the oldest entry on overflow so a slow or absent
//! client can never stall the UI thread. Binding errors additionally
//! persist in the endpoint's pull buffer, so dropping their notification
//! here loses nothing durable.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tracing::trace;

use spyglass_wire::Notification;

#[derive(Debug)]
struct Inner {
    queue: Mutex<VecDeque<Notification>>,
    capacity: usize,
    signal: Notify,
}

/// Cloneable handle to the endpoint's notification queue.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::new()),
                capacity: capacity.max(1),
                signal: Notify::new(),
            }),
        }
    }

    /// Enqueue a notification, dropping the oldest entry when full.
    ///
    /// Callable from any thread; never blocks beyond the queue lock.
    pub fn push(&self, notification: Notification) {
        {
            let mut queue = self.inner.queue.lock().expect("notification queue poisoned");
            if queue.len() >= self.inner.capacity {
                queue.pop_front();
                trace!("notification queue full, dropped oldest");
            }
            queue.push_back(notification);
        }
        self.inner.signal.notify_one();
    }

    fn pop(&self) -> Option<Notification> {
        self.inner
            .queue
            .lock()
            .expect("notification queue poisoned")
            .pop_front()
    }

    /// Wait for the next queued notification.
    ///
    /// Cancel-safe: a notification is only removed from the queue on the
    /// synchronous path to returning it.
    pub async fn next(&self) -> Notification {
        loop {
            let notified = self.inner.signal.notified();
            if let Some(notification) = self.pop() {
                return notification;
            }
            notified.await;
        }
    }

    /// Number of queued notifications.
    pub fn pending(&self) -> usize {
        self.inner
            .queue
            .lock()
            .expect("notification queue poisoned")
            .len()
    }
}

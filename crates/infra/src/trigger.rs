use std::sync::Arc;
use tokio::sync::Notify;

/// Wake signal between today-set mutations and the delivery job.
///
/// Every push/edit/delete/resync rings the signal; the delivery job waits
/// on it while also sleeping towards the nearest due instant, and
/// re-derives that instant whenever the signal fires. `Notify` stores a
/// permit when nobody is waiting, so a ring between two waits is not lost.
#[derive(Clone)]
pub struct TriggerSignal {
    notify: Arc<Notify>,
}

impl TriggerSignal {
    pub fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn wake(&self) {
        self.notify.notify_one();
    }

    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

impl Default for TriggerSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wake_before_wait_is_not_lost() {
        let signal = TriggerSignal::new();
        signal.wake();
        // Completes immediately off the stored permit
        signal.wait().await;
    }

    #[tokio::test]
    async fn wake_releases_a_parked_waiter() {
        let signal = TriggerSignal::new();
        let waiter = signal.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });
        tokio::task::yield_now().await;
        signal.wake();
        handle.await.unwrap();
    }
}

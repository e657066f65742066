//! Cancellable debounce timer
//!
//! Scheduling a new timer atomically cancels the previous unfired one, so at
//! most one page-0 fetch fires per quiet period and it always carries the
//! latest epoch.

use crate::session::controller::SessionEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Collapses bursts of query changes into a single trailing fetch trigger
#[derive(Debug)]
pub struct DebounceGate {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DebounceGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule a `DebounceFired` event for `epoch` after the quiet interval,
    /// cancelling any previously scheduled timer.
    pub fn schedule(&mut self, epoch: u64, events: UnboundedSender<SessionEvent>) {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SessionEvent::DebounceFired { epoch });
        }));
    }

    /// Cancel the pending timer, if any. A cancelled timer never fires.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for DebounceGate {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_schedule_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut gate = DebounceGate::new(Duration::from_millis(500));

        gate.schedule(1, tx.clone());
        gate.schedule(2, tx.clone());
        gate.schedule(3, tx.clone());

        tokio::time::sleep(Duration::from_millis(600)).await;
        drop(tx);

        let event = rx.recv().await.expect("latest timer should fire");
        assert!(matches!(event, SessionEvent::DebounceFired { epoch: 3 }));
        assert!(rx.recv().await.is_none(), "earlier timers must not fire");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut gate = DebounceGate::new(Duration::from_millis(500));

        gate.schedule(1, tx.clone());
        gate.cancel();

        tokio::time::sleep(Duration::from_millis(600)).await;
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_waits_full_quiet_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut gate = DebounceGate::new(Duration::from_millis(500));

        gate.schedule(1, tx.clone());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err(), "timer fired early");

        // A reschedule restarts the quiet interval from now.
        gate.schedule(2, tx.clone());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err(), "reschedule did not restart interval");

        tokio::time::sleep(Duration::from_millis(250)).await;
        let event = rx.try_recv().expect("timer should have fired");
        assert!(matches!(event, SessionEvent::DebounceFired { epoch: 2 }));
    }
}

//! Long-press timer service.
//!
//! The long-press timer is the only asynchronous event source besides the
//! touch stream. Arming always cancels any prior schedule first and disarming
//! is idempotent, so a stale schedule can never outlive the press that armed
//! it.

use crate::app::ButtonEvent;
use crate::error::Result;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Repeating timer driven by the button controller for long-press detection.
pub trait TimerService: Send {
    /// Schedule a repeating tick every `interval`, cancelling any prior
    /// schedule first.
    fn arm(&mut self, interval: Duration) -> Result<()>;

    /// Cancel the current schedule. Safe to call when nothing is armed.
    fn disarm(&mut self);
}

/// Timer that never ticks on its own.
///
/// For platforms that own their timing source and inject
/// [`ButtonEvent::LongPressTick`] themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTimer;

impl TimerService for NullTimer {
    fn arm(&mut self, _interval: Duration) -> Result<()> {
        Ok(())
    }

    fn disarm(&mut self) {}
}

/// Tokio-backed repeating timer that pushes [`ButtonEvent::LongPressTick`]
/// into the controller's event channel.
pub struct TokioTimer {
    events: UnboundedSender<ButtonEvent>,
    running: Option<JoinHandle<()>>,
}

impl TokioTimer {
    /// Create a timer feeding ticks into the given event channel.
    pub fn new(events: UnboundedSender<ButtonEvent>) -> Self {
        Self {
            events,
            running: None,
        }
    }
}

impl TimerService for TokioTimer {
    fn arm(&mut self, interval: Duration) -> Result<()> {
        self.disarm();

        let events = self.events.clone();
        self.running = Some(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                if events.send(ButtonEvent::LongPressTick).is_err() {
                    // Controller gone; the schedule dies with it.
                    break;
                }
            }
        }));
        Ok(())
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.running.take() {
            handle.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::{advance, timeout};

    #[tokio::test(start_paused = true)]
    async fn armed_timer_ticks_repeatedly() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = TokioTimer::new(tx);

        timer.arm(Duration::from_millis(50)).unwrap();
        advance(Duration::from_millis(120)).await;

        assert!(matches!(rx.recv().await, Some(ButtonEvent::LongPressTick)));
        assert!(matches!(rx.recv().await, Some(ButtonEvent::LongPressTick)));
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_cancels_the_previous_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = TokioTimer::new(tx);

        timer.arm(Duration::from_millis(50)).unwrap();
        timer.arm(Duration::from_secs(60)).unwrap();
        advance(Duration::from_millis(200)).await;

        assert!(
            timeout(Duration::from_millis(1), rx.recv()).await.is_err(),
            "old 50ms schedule must not tick after rearm"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_is_idempotent_and_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = TokioTimer::new(tx);

        timer.disarm();
        timer.arm(Duration::from_millis(50)).unwrap();
        timer.disarm();
        timer.disarm();

        advance(Duration::from_millis(200)).await;
        assert!(timeout(Duration::from_millis(1), rx.recv()).await.is_err());
    }
}

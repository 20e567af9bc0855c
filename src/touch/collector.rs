//! Low-level touch collection: coalescing of high-frequency pressure updates and
//! ordered queueing of phase events before the press state machine sees them.
//!
//! Pressure-capable hardware reports `Changed` samples far faster than the
//! 100 ms transition animation can consume them. Within the coalescing window
//! only the most recent pressure reading survives; `Began`/`Ended`/`Cancelled`
//! samples are never coalesced and always flush pending changes first so event
//! order is preserved.

use crate::touch::sample::{TouchPhase, TouchSample};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default coalescing window in milliseconds for pressure-change samples.
const DEFAULT_COALESCE_WINDOW_MS: u64 = 12;

/// Aggregates high-frequency `Changed` samples; the latest reading wins.
#[derive(Debug, Clone)]
pub struct PressureCoalescer {
    window: Duration,
    pending: Option<PendingChange>,
}

#[derive(Debug, Clone)]
struct PendingChange {
    sample: TouchSample,
    first_event: Instant,
}

impl PressureCoalescer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn with_default_window() -> Self {
        Self::new(Duration::from_millis(DEFAULT_COALESCE_WINDOW_MS))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Register a `Changed` sample. Returns a sample to emit once the window
    /// since the first held change has elapsed; otherwise the reading is held
    /// and superseded by later ones.
    pub fn push(&mut self, sample: TouchSample, now: Instant) -> Option<TouchSample> {
        debug_assert_eq!(sample.phase, TouchPhase::Changed);
        match self.pending {
            None => {
                self.pending = Some(PendingChange {
                    sample,
                    first_event: now,
                });
                None
            }
            Some(ref mut pending) => {
                pending.sample = sample;
                if now.duration_since(pending.first_event) >= self.window {
                    self.flush()
                } else {
                    None
                }
            }
        }
    }

    /// Flush the held change if the coalescing window has expired.
    pub fn flush_if_stale(&mut self, now: Instant) -> Option<TouchSample> {
        if let Some(pending) = &self.pending {
            if now.duration_since(pending.first_event) >= self.window {
                return self.flush();
            }
        }
        None
    }

    /// Flush the held change immediately.
    pub fn flush(&mut self) -> Option<TouchSample> {
        self.pending.take().map(|pending| pending.sample)
    }

    /// Return true when no change is being held.
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

/// Collector that queues touch samples and applies pressure coalescing.
#[derive(Debug, Clone)]
pub struct TouchCollector {
    coalescer: PressureCoalescer,
    pending_events: VecDeque<TouchSample>,
}

impl TouchCollector {
    /// Create a collector with the default coalescing window.
    pub fn new() -> Self {
        Self {
            coalescer: PressureCoalescer::with_default_window(),
            pending_events: VecDeque::new(),
        }
    }

    /// Create a collector with a custom coalescing window (useful for tests).
    pub fn with_window(window: Duration) -> Self {
        Self {
            coalescer: PressureCoalescer::new(window),
            pending_events: VecDeque::new(),
        }
    }

    /// The coalescing window, exposed so event loops can schedule a wakeup for
    /// a held pressure change.
    pub fn window(&self) -> Duration {
        self.coalescer.window()
    }

    /// Check whether the collector has no queued samples or held change.
    pub fn is_idle(&self) -> bool {
        self.pending_events.is_empty() && self.coalescer.is_empty()
    }

    /// Feed one raw sample into the collector.
    pub fn push(&mut self, sample: TouchSample, now: Instant) {
        match sample.phase {
            TouchPhase::Changed => {
                if let Some(emitted) = self.coalescer.push(sample, now) {
                    self.pending_events.push_back(emitted);
                }
            }
            _ => {
                // Phase boundaries flush the held pressure reading first so the
                // machine sees the final reading before the release/cancel.
                if let Some(held) = self.coalescer.flush() {
                    self.pending_events.push_back(held);
                }
                self.pending_events.push_back(sample);
            }
        }
    }

    /// Retrieve the next sample ready for processing, if any.
    pub fn try_flush(&mut self, now: Instant) -> Option<TouchSample> {
        self.pending_events
            .pop_front()
            .or_else(|| self.coalescer.flush_if_stale(now))
    }
}

impl Default for TouchCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::touch::sample::Point;

    fn changed(pressure: f64) -> TouchSample {
        TouchSample::changed(Point::default(), Some(pressure))
    }

    #[test]
    fn latest_pressure_wins_within_window() {
        let mut collector = TouchCollector::with_window(Duration::from_millis(10));
        let now = Instant::now();

        collector.push(changed(1.0), now);
        collector.push(changed(2.0), now + Duration::from_millis(3));
        collector.push(changed(3.0), now + Duration::from_millis(6));

        // Window not yet elapsed: nothing ready.
        assert!(collector
            .try_flush(now + Duration::from_millis(6))
            .is_none());

        let flushed = collector
            .try_flush(now + Duration::from_millis(11))
            .expect("window elapsed");
        assert_eq!(flushed.pressure, Some(3.0));
        assert!(collector.is_idle());
    }

    #[test]
    fn sustained_stream_emits_once_per_window() {
        let mut collector = TouchCollector::with_window(Duration::from_millis(10));
        let now = Instant::now();

        collector.push(changed(1.0), now);
        let emitted = {
            collector.push(changed(2.0), now + Duration::from_millis(12));
            collector.try_flush(now + Duration::from_millis(12))
        };
        assert_eq!(emitted.map(|s| s.pressure), Some(Some(2.0)));

        // The stream continues; the next reading starts a fresh window.
        collector.push(changed(4.0), now + Duration::from_millis(14));
        assert!(collector
            .try_flush(now + Duration::from_millis(14))
            .is_none());
    }

    #[test]
    fn phase_boundary_flushes_held_change_in_order() {
        let mut collector = TouchCollector::with_window(Duration::from_millis(10));
        let now = Instant::now();

        collector.push(changed(2.5), now);
        collector.push(TouchSample::ended(Point::new(3.0, 4.0)), now);

        let first = collector.try_flush(now).unwrap();
        assert_eq!(first.phase, TouchPhase::Changed);
        assert_eq!(first.pressure, Some(2.5));

        let second = collector.try_flush(now).unwrap();
        assert_eq!(second.phase, TouchPhase::Ended);
        assert!(collector.is_idle());
    }

    #[test]
    fn began_and_cancelled_pass_straight_through() {
        let mut collector = TouchCollector::new();
        let now = Instant::now();

        collector.push(TouchSample::began(Point::default()), now);
        assert_eq!(
            collector.try_flush(now).map(|s| s.phase),
            Some(TouchPhase::Began)
        );

        collector.push(TouchSample::cancelled(), now);
        assert_eq!(
            collector.try_flush(now).map(|s| s.phase),
            Some(TouchPhase::Cancelled)
        );
        assert!(collector.is_idle());
    }
}

//! Touch sample primitives.
//!
//! A [`TouchSample`] is an immutable snapshot of one touch or pointer update.
//! Samples are replaced wholesale on each event and never mutated in place.

/// A point in the control's own coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Phase of a touch/pointer update as reported by the platform gesture source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Immutable snapshot of one touch/pointer update.
///
/// `pressure` is in platform force units (0 is a feather touch, roughly 6.67
/// is the maximum reportable force) and is absent on hardware without pressure
/// sensing — absence simply disables the pressure-response re-plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub location: Point,
    pub pressure: Option<f64>,
    pub phase: TouchPhase,
}

impl TouchSample {
    /// A `Began` sample at the given location.
    pub fn began(location: Point) -> Self {
        Self {
            location,
            pressure: None,
            phase: TouchPhase::Began,
        }
    }

    /// A `Changed` sample, optionally carrying a pressure reading.
    pub fn changed(location: Point, pressure: Option<f64>) -> Self {
        Self {
            location,
            pressure,
            phase: TouchPhase::Changed,
        }
    }

    /// An `Ended` sample at the final touch location.
    pub fn ended(location: Point) -> Self {
        Self {
            location,
            pressure: None,
            phase: TouchPhase::Ended,
        }
    }

    /// A `Cancelled` sample. The location is meaningless for cancellation.
    pub fn cancelled() -> Self {
        Self {
            location: Point::default(),
            pressure: None,
            phase: TouchPhase::Cancelled,
        }
    }
}

//! Touch input subsystem.
//!
//! Platform gesture sources deliver [`TouchSample`]s on begin/change/end/cancel;
//! the collector normalizes high-frequency pressure bursts before they reach
//! the press state machine.

pub mod collector;
pub mod sample;

// Public re-exports for convenience. Modules outside this crate should prefer importing
// from `crate::touch` rather than reaching into submodules.
pub use collector::{PressureCoalescer, TouchCollector};
pub use sample::{Point, TouchPhase, TouchSample};

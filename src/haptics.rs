//! Haptics collaborator seam.
//!
//! The core prepares and triggers abstract haptic impacts; driving actual
//! haptic hardware is the platform layer's job. Engines report availability so
//! the controller can degrade to silence instead of failing when the hardware
//! is absent.

use crate::error::Result;

/// Strength of a prepared haptic impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStrength {
    Light,
    Strong,
}

/// Haptic feedback engine driven by the button controller.
pub trait HapticEngine: Send {
    /// Whether the underlying hardware can play impacts at all.
    fn is_available(&self) -> bool;

    /// Warm up the engine so a following impact plays with minimal latency.
    fn prepare_impact(&mut self, strength: ImpactStrength) -> Result<()>;

    /// Play the prepared impact.
    fn trigger_impact(&mut self) -> Result<()>;
}

/// Engine for hardware without haptics; reports unavailable and swallows calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHaptics;

impl HapticEngine for NullHaptics {
    fn is_available(&self) -> bool {
        false
    }

    fn prepare_impact(&mut self, _strength: ImpactStrength) -> Result<()> {
        Ok(())
    }

    fn trigger_impact(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Engine that logs impacts instead of playing them; used by the simulator.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHaptics {
    prepared: Option<ImpactStrength>,
}

impl LoggingHaptics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HapticEngine for LoggingHaptics {
    fn is_available(&self) -> bool {
        true
    }

    fn prepare_impact(&mut self, strength: ImpactStrength) -> Result<()> {
        log::debug!("haptics: prepared {strength:?} impact");
        self.prepared = Some(strength);
        Ok(())
    }

    fn trigger_impact(&mut self) -> Result<()> {
        match self.prepared.take() {
            Some(strength) => log::info!("haptics: {strength:?} impact"),
            None => log::info!("haptics: impact without preparation"),
        }
        Ok(())
    }
}

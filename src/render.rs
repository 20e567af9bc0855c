//! Rendering collaborator seam.
//!
//! The press core never draws pixels; it drives an abstract [`RenderSurface`]
//! owned by the platform layer. `set_glow_opacity` doubles as the animation
//! completion gate — its future resolves when the platform animation facility
//! finishes, which is the moment the controller commits an in-flight
//! transition.

use crate::config::{Appearance, ButtonStyle};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Surface a button controller renders onto.
#[async_trait]
pub trait RenderSurface: Send {
    /// Apply a uniform scale transform to the control.
    fn apply_transform(&mut self, scale: f64) -> Result<()>;

    /// Animate the glow/shadow opacity toward `opacity` over `duration`.
    ///
    /// Resolves at animation completion. Implementations that cannot animate
    /// may resolve immediately.
    async fn set_glow_opacity(&mut self, opacity: f64, duration: Duration) -> Result<()>;

    /// Push border and backlight styling down to the platform layer.
    fn set_border_style(&mut self, style: ButtonStyle, appearance: &Appearance) -> Result<()>;

    /// Request a redraw of the control.
    fn redraw(&mut self) -> Result<()>;
}

/// Surface that ignores every operation and completes instantly.
///
/// Useful for headless operation and for tests that only care about state
/// machine behavior.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

#[async_trait]
impl RenderSurface for NullSurface {
    fn apply_transform(&mut self, _scale: f64) -> Result<()> {
        Ok(())
    }

    async fn set_glow_opacity(&mut self, _opacity: f64, _duration: Duration) -> Result<()> {
        Ok(())
    }

    fn set_border_style(&mut self, _style: ButtonStyle, _appearance: &Appearance) -> Result<()> {
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Surface that logs every operation, optionally pacing animations in real
/// time. Used by the simulator binary to make transition timing visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSurface {
    paced: bool,
}

impl LoggingSurface {
    /// A logging surface whose animations complete immediately.
    pub fn new() -> Self {
        Self { paced: false }
    }

    /// A logging surface that sleeps for each animation's duration, matching
    /// the pacing a real platform animation would have.
    pub fn paced() -> Self {
        Self { paced: true }
    }
}

#[async_trait]
impl RenderSurface for LoggingSurface {
    fn apply_transform(&mut self, scale: f64) -> Result<()> {
        log::info!("render: transform scale {scale:.3}");
        Ok(())
    }

    async fn set_glow_opacity(&mut self, opacity: f64, duration: Duration) -> Result<()> {
        log::info!(
            "render: glow opacity {opacity:.2} over {} ms",
            duration.as_millis()
        );
        if self.paced {
            tokio::time::sleep(duration).await;
        }
        Ok(())
    }

    fn set_border_style(&mut self, style: ButtonStyle, appearance: &Appearance) -> Result<()> {
        log::info!(
            "render: style {style:?}, backlight {:?}, border backlit: {}",
            appearance.backlight_color,
            appearance.border_backlit_when_enabled
        );
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        log::trace!("render: redraw requested");
        Ok(())
    }
}

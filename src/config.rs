//! Button configuration surface.
//!
//! All fields are read-only to the press core; they are set externally through
//! [`ButtonConfig`] and applied via the controller's `configure` call. The
//! appearance fields affect only the rendering collaborator, never the state
//! machine. With the `config` cargo feature enabled the configuration can be
//! loaded from a TOML file.

use crate::error::{ButtonError, Result};
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default long-press duration in seconds.
const DEFAULT_LONG_PRESS_SECS: f64 = 2.0;
/// Upper bound for the scale multiplier; beyond this the control would scale
/// outside any reasonable bounds rect.
const MAX_SCALE_MULTIPLIER: f64 = 10.0;

/// Visual style of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum ButtonStyle {
    /// Flat bordered button without glow effects.
    #[default]
    Classic,
    /// Backlit button with a glow shadow that tracks the press state.
    Glow,
}

/// Appearance settings consumed only by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Appearance {
    /// Backlight color as RGBA bytes.
    pub backlight_color: [u8; 4],
    /// Whether the border is backlit while the button is enabled.
    pub border_backlit_when_enabled: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            // Yellow backlight, matching the classic hardware look.
            backlight_color: [255, 255, 0, 255],
            border_backlit_when_enabled: true,
        }
    }
}

/// Configuration for a push-button control.
///
/// Set once or rarely; the state machine and planner read a snapshot of it on
/// every event. `use_3d_touch` and `use_haptic_feedback` are requests — the
/// controller additionally gates them on reported hardware capability and
/// degrades to disabling the feature rather than failing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ButtonConfig {
    /// How long a press must be held before the long-press observer fires.
    pub long_press_duration: Duration,
    /// Scales the press/release transform factors from the transition table.
    pub scale_multiplier: f64,
    /// Enable pressure-sensitive response while a press transition is settled.
    pub use_3d_touch: bool,
    /// Fire haptic impacts when a transition lands on On or Off.
    pub use_haptic_feedback: bool,
    /// Visual style of the control.
    pub style: ButtonStyle,
    /// Rendering-only appearance settings.
    pub appearance: Appearance,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            long_press_duration: Duration::from_secs_f64(DEFAULT_LONG_PRESS_SECS),
            scale_multiplier: 1.0,
            use_3d_touch: true,
            use_haptic_feedback: true,
            style: ButtonStyle::Classic,
            appearance: Appearance::default(),
        }
    }
}

impl ButtonConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration for values the press core cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.long_press_duration.is_zero() {
            return Err(ButtonError::config("long press duration must be positive"));
        }

        if !self.scale_multiplier.is_finite() || self.scale_multiplier <= 0.0 {
            return Err(ButtonError::config("scale multiplier must be positive"));
        }

        if self.scale_multiplier > MAX_SCALE_MULTIPLIER {
            return Err(ButtonError::config(format!(
                "scale multiplier must be at most {}",
                MAX_SCALE_MULTIPLIER
            )));
        }

        Ok(())
    }

    /// Glow style drives the shadow/backlight effects on the render surface.
    pub fn uses_fancy_effects(&self) -> bool {
        matches!(self.style, ButtonStyle::Glow)
    }
}

#[cfg(feature = "config")]
impl ButtonConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|err| ButtonError::config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Load the user-level configuration if one exists.
    ///
    /// Looks for `pushbutton/config.toml` under the platform configuration
    /// directory. Returns `Ok(None)` when no file is present.
    pub fn load_default() -> Result<Option<Self>> {
        let Some(base) = dirs::config_dir() else {
            return Ok(None);
        };
        let path = base.join("pushbutton").join("config.toml");
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from_path(path).map(Some)
    }
}

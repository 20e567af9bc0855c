//! Animation transition planning.
//!
//! Pure functions mapping a `(current, target)` state pair — or a live pressure
//! reading — to the scale, glow brightness and duration the rendering
//! collaborator applies. No state lives here; plans are produced fresh per
//! transition and consumed within a single event-processing step.

use crate::config::ButtonConfig;
use crate::press::state::AnimationState;
use std::time::Duration;

/// Duration of every table-driven transition animation.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(100);
/// Duration of the secondary glow fade after the control lands on `Off`.
pub const GLOW_FADE_DURATION: Duration = Duration::from_millis(500);

/// Glow brightness while a press is being pushed in.
const PRESSED_BRIGHTNESS: f64 = 1.0;
/// Glow brightness once a press settles on `On`.
const SETTLED_BRIGHTNESS: f64 = 0.9;

/// Inner floor of the pressure-response curve, before the fixed lift.
const PRESSURE_SCALE_FLOOR: f64 = 0.6;
/// Hard ceiling of the pressure-response scale.
const PRESSURE_SCALE_CEILING: f64 = 0.75;
/// Fixed lift added after flooring the force term.
const PRESSURE_SCALE_LIFT: f64 = 0.1;
/// Maximum reportable platform force.
const MAX_FORCE: f64 = 20.0 / 3.0;

/// Computed parameters for moving between two animation states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionPlan {
    /// Transform scale factor to apply.
    pub scale: f64,
    /// Glow brightness target in `[0, 1]`; `None` leaves brightness unchanged.
    pub brightness: Option<f64>,
    /// Whether a haptic impact accompanies this plan.
    pub fires_haptic_impact: bool,
    /// Animation duration; its completion commits the transition.
    pub duration: Duration,
}

impl TransitionPlan {
    /// Neutral plan for externally forced transitions outside the table: the
    /// control settles at identity scale with its brightness untouched.
    pub fn settle() -> Self {
        Self {
            scale: 1.0,
            brightness: None,
            fires_haptic_impact: false,
            duration: TRANSITION_DURATION,
        }
    }
}

/// Plan a table-driven transition from `current` to `target`.
///
/// Pairs outside the table return `None`; callers treat that as a silent no-op
/// so out-of-order or duplicate events cannot produce a bogus animation. The
/// haptic impact fires exactly when the resulting state is `On` or `Off` and
/// haptic feedback is configured on; override suppression is applied by the
/// state machine, not here.
pub fn plan_transition(
    current: AnimationState,
    target: AnimationState,
    config: &ButtonConfig,
) -> Option<TransitionPlan> {
    use AnimationState::{Off, On, PushOff, PushOn};

    let (scale, brightness) = match (current, target) {
        (Off, PushOn) => (0.7 * config.scale_multiplier, Some(PRESSED_BRIGHTNESS)),
        (PushOn, On) => (0.8 * config.scale_multiplier, Some(SETTLED_BRIGHTNESS)),
        (PushOn, Off) => (1.0, None),
        (On, PushOff) => (0.7 * config.scale_multiplier, Some(PRESSED_BRIGHTNESS)),
        (On, Off) => (1.0, None),
        (PushOff, Off) => (1.0, None),
        (PushOff, On) => (0.8 * config.scale_multiplier, Some(SETTLED_BRIGHTNESS)),
        _ => return None,
    };

    Some(TransitionPlan {
        scale,
        brightness,
        fires_haptic_impact: config.use_haptic_feedback
            && matches!(target, On | Off),
        duration: TRANSITION_DURATION,
    })
}

/// Plan a pressure-response adjustment while a press transition is settled on
/// `PushOn`/`PushOff`.
///
/// The curve floors the force term at 0.6 before adding a fixed 0.1 lift and
/// capping at 0.75, so harder presses shrink the control toward the lifted
/// floor of 0.7 and a feather touch sits at the 0.75 ceiling. The plan never
/// fires a haptic impact and never commits state.
pub fn plan_pressure(pressure: f64) -> TransitionPlan {
    let force_term = ((MAX_FORCE - pressure) / 10.0).max(PRESSURE_SCALE_FLOOR);
    let scale = (force_term + PRESSURE_SCALE_LIFT).min(PRESSURE_SCALE_CEILING);

    TransitionPlan {
        scale,
        brightness: Some(PRESSED_BRIGHTNESS),
        fires_haptic_impact: false,
        duration: TRANSITION_DURATION,
    }
}

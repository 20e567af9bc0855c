//! Press state machine.
//!
//! Consumes touch phase events, long-press timer ticks and external overrides;
//! owns the current/target state pair and yields domain-level [`PressAction`]s
//! that the button controller executes against its collaborators. The machine
//! is synchronous: asynchronous animation completion is reported back through
//! [`PressStateMachine::complete_transition`], the single point where `current`
//! is committed and observers are notified.

use crate::animation::{self, TransitionPlan, GLOW_FADE_DURATION};
use crate::config::ButtonConfig;
use crate::press::state::AnimationState;
use crate::touch::{Point, TouchPhase, TouchSample};
use std::time::Duration;

/// Side effects requested by the state machine, executed by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum PressAction {
    /// (Re)arm the repeating long-press timer; arming cancels any prior schedule.
    ArmLongPress { interval: Duration },
    /// Cancel the long-press timer. Safe to execute when no timer is armed.
    DisarmLongPress,
    /// Warm up the haptics engine for an imminent impact.
    PrepareHaptic,
    /// Animate the surface per the plan, then report completion back via
    /// `complete_transition`.
    RunTransition(TransitionPlan),
    /// Fade the glow indicator to zero after the control lands on `Off`.
    FadeGlow { duration: Duration },
    /// Cancelled press: snap the transform back to identity and fade the glow
    /// without any observer notification.
    ResetVisuals,
    /// A transition committed and observers should hear about it.
    NotifyStateChanged {
        state: AnimationState,
        location: Point,
    },
    /// The long-press timer ticked while the press is still held.
    NotifyLongPressed {
        state: AnimationState,
        location: Point,
    },
}

/// What the surface is currently animating, between `RunTransition` and the
/// completion callback.
#[derive(Debug, Clone, Copy, PartialEq)]
enum InFlight {
    /// Table-driven transition; commits `target` on completion.
    Table {
        target: AnimationState,
        notify: bool,
    },
    /// Pressure re-plan; commits nothing and notifies nobody.
    Pressure,
}

/// State machine mapping raw touch/timer events onto animation transitions.
pub struct PressStateMachine {
    config: ButtonConfig,
    current: AnimationState,
    target: Option<AnimationState>,
    in_flight: Option<InFlight>,
    last_sample: Option<TouchSample>,
    long_press_fired: bool,
    suppress_next_notification: bool,
}

impl PressStateMachine {
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            current: AnimationState::Off,
            target: None,
            in_flight: None,
            last_sample: None,
            long_press_fired: false,
            suppress_next_notification: false,
        }
    }

    /// Replace the configuration snapshot the machine plans against.
    ///
    /// The caller is responsible for capability gating (`use_3d_touch`,
    /// `use_haptic_feedback`) before handing the configuration over.
    pub fn set_config(&mut self, config: ButtonConfig) {
        self.config = config;
    }

    /// Last committed, non-transitional-or-not state.
    pub fn current_state(&self) -> AnimationState {
        self.current
    }

    /// The state a pending transition is animating toward, if any.
    pub fn target_state(&self) -> Option<AnimationState> {
        self.target
    }

    /// True whenever the control is anywhere but fully off.
    pub fn is_enabled(&self) -> bool {
        self.current != AnimationState::Off
    }

    /// Location of the most recent touch sample, if a touch has been seen.
    pub fn last_touch_location(&self) -> Option<Point> {
        self.last_sample.map(|sample| sample.location)
    }

    /// Process one touch sample.
    pub fn handle_touch(&mut self, sample: TouchSample) -> Vec<PressAction> {
        let mut actions = Vec::new();

        match sample.phase {
            TouchPhase::Began => {
                self.last_sample = Some(sample);
                actions.push(PressAction::ArmLongPress {
                    interval: self.config.long_press_duration,
                });

                self.target = Some(if self.current.is_resting_side() {
                    AnimationState::PushOn
                } else {
                    AnimationState::PushOff
                });

                // Re-press while a previous press is still mid-animation: warm
                // the haptics engine so the upcoming impact has no latency.
                if self.current.is_transitional() && self.config.use_haptic_feedback {
                    actions.push(PressAction::PrepareHaptic);
                }

                self.evaluate(&mut actions, false);
            }
            TouchPhase::Changed => {
                self.last_sample = Some(sample);

                if self.config.use_3d_touch
                    && self.current.is_transitional()
                    && self.in_flight.is_none()
                {
                    // Absent pressure means no pressure-mode re-plan.
                    if let Some(pressure) = sample.pressure {
                        self.in_flight = Some(InFlight::Pressure);
                        actions.push(PressAction::RunTransition(animation::plan_pressure(
                            pressure,
                        )));
                    }
                }
            }
            TouchPhase::Ended => {
                self.last_sample = Some(sample);
                actions.push(PressAction::DisarmLongPress);

                let target = if self.long_press_fired {
                    // A long press forces On at release regardless of where the
                    // press had gotten to.
                    self.long_press_fired = false;
                    AnimationState::On
                } else if self.current.is_resting_side() {
                    AnimationState::On
                } else {
                    AnimationState::Off
                };
                self.target = Some(target);

                self.evaluate(&mut actions, false);
            }
            TouchPhase::Cancelled => {
                actions.push(PressAction::DisarmLongPress);
                self.last_sample = None;
                self.long_press_fired = false;
                self.target = None;
                self.in_flight = None;
                self.suppress_next_notification = false;
                self.current = AnimationState::Off;
                log::debug!("press cancelled, state reset to off");
                actions.push(PressAction::ResetVisuals);
            }
        }

        actions
    }

    /// Process one long-press timer tick.
    ///
    /// The timer repeats while held, so this can fire more than once per press;
    /// the first fire is sufficient to force `On` at release and each fire
    /// re-notifies the observer. Ticks that slipped into the queue after the
    /// press already ended are dropped.
    pub fn long_press_tick(&mut self) -> Vec<PressAction> {
        let held = matches!(
            self.last_sample.map(|sample| sample.phase),
            Some(TouchPhase::Began) | Some(TouchPhase::Changed)
        );
        if !held {
            return Vec::new();
        }

        self.long_press_fired = true;
        log::debug!("long press fired in state {}", self.current);
        vec![PressAction::NotifyLongPressed {
            state: self.current,
            location: self.last_touch_location().unwrap_or_default(),
        }]
    }

    /// Force the machine toward an arbitrary state, bypassing touch logic.
    ///
    /// The transition produced by this call completes without notifying the
    /// observer (suppressed exactly once); all subsequent transitions notify
    /// normally. Forcing the state the control is already in is a no-op.
    pub fn override_state(&mut self, state: AnimationState) -> Vec<PressAction> {
        let mut actions = Vec::new();
        self.target = Some(state);
        self.suppress_next_notification = true;
        self.evaluate(&mut actions, true);
        actions
    }

    /// Report that the animation for the last emitted `RunTransition` finished.
    ///
    /// Commits `current`, clears the target, emits the observer notification
    /// and, when the control lands on `Off`, the secondary glow fade. A target
    /// that arrived while the animation ran is re-evaluated from the newly
    /// committed state.
    pub fn complete_transition(&mut self) -> Vec<PressAction> {
        let mut actions = Vec::new();

        match self.in_flight.take() {
            None => {
                // Spurious completion; nothing was in flight.
            }
            Some(InFlight::Pressure) => {
                // The press stays pending on its transitional state.
            }
            Some(InFlight::Table { target, notify }) => {
                self.current = target;
                self.target = None;
                log::trace!("press state committed: {}", self.current);

                if notify {
                    actions.push(PressAction::NotifyStateChanged {
                        state: self.current,
                        location: self.last_touch_location().unwrap_or_default(),
                    });
                }

                if self.current == AnimationState::Off {
                    actions.push(PressAction::FadeGlow {
                        duration: GLOW_FADE_DURATION,
                    });
                }

                self.evaluate(&mut actions, false);
            }
        }

        actions
    }

    /// Evaluate the pending target, emitting a `RunTransition` when a plan
    /// exists. `forced` marks externally overridden targets, which fall back to
    /// a neutral settle plan when the pair sits outside the transition table.
    fn evaluate(&mut self, actions: &mut Vec<PressAction>, forced: bool) {
        if self.in_flight.is_some() {
            // An uncompleted animation owns the surface; the new target is
            // picked up when complete_transition re-evaluates.
            return;
        }

        let Some(target) = self.target else {
            return;
        };

        if target == self.current {
            // Duplicate processing within a single event tick: no plan, no
            // notification, and nothing left to suppress.
            self.target = None;
            self.suppress_next_notification = false;
            return;
        }

        let planned = match animation::plan_transition(self.current, target, &self.config) {
            Some(plan) => plan,
            None if forced => TransitionPlan::settle(),
            None => {
                // Out-of-order or duplicate touch events land here; ignore.
                log::trace!("ignoring invalid transition {} -> {}", self.current, target);
                self.target = None;
                self.suppress_next_notification = false;
                return;
            }
        };

        let mut plan = planned;
        let notify = !self.suppress_next_notification;
        if self.suppress_next_notification {
            plan.fires_haptic_impact = false;
            self.suppress_next_notification = false;
        }

        self.in_flight = Some(InFlight::Table { target, notify });
        actions.push(PressAction::RunTransition(plan));
    }
}

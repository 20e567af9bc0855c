//! Button controller and event loop.
//!
//! [`ButtonController`] is the top-level façade: it feeds platform touch
//! events and timer ticks into the press state machine and executes the
//! machine's actions against the rendering, haptics and timer collaborators.
//! [`button_event_loop`] wraps a controller in a channel-driven task so a
//! gesture source can drive it through a cloneable [`ButtonHandle`].

use crate::animation::GLOW_FADE_DURATION;
use crate::config::ButtonConfig;
use crate::error::{ButtonError, Result};
use crate::haptics::{HapticEngine, ImpactStrength};
use crate::press::{AnimationState, PressAction, PressStateMachine};
use crate::render::RenderSurface;
use crate::timer::{TimerService, TokioTimer};
use crate::touch::{Point, TouchCollector, TouchSample};
use std::collections::VecDeque;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Glow brightness of a control at rest.
const RESTING_GLOW: f64 = 0.0;

/// Events consumed by the button event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ButtonEvent {
    /// A touch/pointer update from the platform gesture source.
    Touch(TouchSample),
    /// The long-press timer fired.
    LongPressTick,
    /// Programmatically force a state, bypassing touch logic.
    Override(AnimationState),
    /// Replace the configuration.
    Configure(ButtonConfig),
    /// Gate whether incoming touches are processed at all.
    AcceptTouches(bool),
    /// Stop the event loop.
    Shutdown,
}

/// Notifications emitted to registered observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonNotification {
    /// A transition completed and committed a new state.
    StateChanged {
        state: AnimationState,
        location: Point,
    },
    /// The long-press timer ticked while the press is held.
    LongPressed {
        state: AnimationState,
        location: Point,
    },
}

/// Top-level façade coordinating the press state machine and its collaborators.
pub struct ButtonController {
    machine: PressStateMachine,
    surface: Box<dyn RenderSurface>,
    haptics: Box<dyn HapticEngine>,
    timer: Box<dyn TimerService>,
    /// Requested configuration; capability gating is applied on top.
    config: ButtonConfig,
    pressure_capable: bool,
    accepts_touches: bool,
    /// Last brightness applied to the surface, reused by plans that leave
    /// brightness unchanged.
    glow: f64,
    observers: Vec<mpsc::UnboundedSender<ButtonNotification>>,
}

impl ButtonController {
    /// Create a controller by wiring the collaborators together.
    ///
    /// Pressure capability defaults to unavailable; platforms with a
    /// force-reporting gesture source enable it via
    /// [`set_pressure_capability`](Self::set_pressure_capability).
    pub fn new(
        surface: Box<dyn RenderSurface>,
        haptics: Box<dyn HapticEngine>,
        timer: Box<dyn TimerService>,
        config: ButtonConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut controller = Self {
            machine: PressStateMachine::new(config.clone()),
            surface,
            haptics,
            timer,
            config,
            pressure_capable: false,
            accepts_touches: true,
            glow: RESTING_GLOW,
            observers: Vec::new(),
        };
        controller.apply_effective_config()?;
        Ok(controller)
    }

    /// Record whether the gesture source reports pressure (3D-touch) support.
    pub fn set_pressure_capability(&mut self, available: bool) {
        self.pressure_capable = available;
        self.machine.set_config(self.effective_config());
    }

    /// Gate whether incoming touch samples are processed.
    pub fn set_accepts_touches(&mut self, accept: bool) {
        self.accepts_touches = accept;
    }

    /// Replace the configuration and push appearance changes to the surface.
    pub fn configure(&mut self, config: ButtonConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.apply_effective_config()
    }

    /// Register an observer; notifications arrive on the returned channel.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ButtonNotification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    /// Last committed animation state.
    pub fn current_state(&self) -> AnimationState {
        self.machine.current_state()
    }

    /// True whenever the control is anywhere but fully off.
    pub fn is_enabled(&self) -> bool {
        self.machine.is_enabled()
    }

    /// Process one touch sample from the gesture source.
    pub async fn on_touch(&mut self, sample: TouchSample) -> Result<()> {
        if !self.accepts_touches {
            log::trace!("touch dropped, control not accepting touches");
            return Ok(());
        }
        let actions = self.machine.handle_touch(sample);
        self.execute(actions).await
    }

    /// Process one long-press timer tick.
    pub async fn on_long_press_tick(&mut self) -> Result<()> {
        let actions = self.machine.long_press_tick();
        self.execute(actions).await
    }

    /// Force the control toward a state, suppressing one notification.
    pub async fn override_state(&mut self, state: AnimationState) -> Result<()> {
        let actions = self.machine.override_state(state);
        self.execute(actions).await
    }

    fn effective_config(&self) -> ButtonConfig {
        let mut effective = self.config.clone();

        if effective.use_3d_touch && !self.pressure_capable {
            log::debug!("pressure response requested but hardware lacks it; disabling");
            effective.use_3d_touch = false;
        }
        if effective.use_haptic_feedback && !self.haptics.is_available() {
            log::debug!("haptic feedback requested but engine unavailable; disabling");
            effective.use_haptic_feedback = false;
        }

        effective
    }

    fn apply_effective_config(&mut self) -> Result<()> {
        self.machine.set_config(self.effective_config());
        self.surface
            .set_border_style(self.config.style, &self.config.appearance)?;
        self.surface.redraw()
    }

    /// Execute machine actions in order. Transition completions may append
    /// follow-up actions, which run before anything still queued.
    async fn execute(&mut self, actions: Vec<PressAction>) -> Result<()> {
        let mut queue: VecDeque<PressAction> = actions.into();

        while let Some(action) = queue.pop_front() {
            match action {
                PressAction::ArmLongPress { interval } => {
                    self.timer.arm(interval)?;
                }
                PressAction::DisarmLongPress => {
                    self.timer.disarm();
                }
                PressAction::PrepareHaptic => {
                    self.haptics.prepare_impact(ImpactStrength::Light)?;
                }
                PressAction::RunTransition(plan) => {
                    if plan.fires_haptic_impact {
                        self.haptics.prepare_impact(ImpactStrength::Light)?;
                        self.haptics.trigger_impact()?;
                    }

                    self.surface.apply_transform(plan.scale)?;
                    let glow = plan.brightness.unwrap_or(self.glow);
                    self.surface.set_glow_opacity(glow, plan.duration).await?;
                    self.glow = glow;

                    // Completion commits the transition; its follow-up actions
                    // (notification, glow fade, queued target) come first.
                    for (idx, follow_up) in
                        self.machine.complete_transition().into_iter().enumerate()
                    {
                        queue.insert(idx, follow_up);
                    }
                }
                PressAction::FadeGlow { duration } => {
                    self.surface.set_glow_opacity(RESTING_GLOW, duration).await?;
                    self.glow = RESTING_GLOW;
                }
                PressAction::ResetVisuals => {
                    self.surface.apply_transform(1.0)?;
                    self.surface
                        .set_glow_opacity(RESTING_GLOW, GLOW_FADE_DURATION)
                        .await?;
                    self.glow = RESTING_GLOW;
                }
                PressAction::NotifyStateChanged { state, location } => {
                    self.notify(ButtonNotification::StateChanged { state, location });
                }
                PressAction::NotifyLongPressed { state, location } => {
                    self.notify(ButtonNotification::LongPressed { state, location });
                }
            }
        }

        Ok(())
    }

    fn notify(&mut self, notification: ButtonNotification) {
        // Prune observers whose receiving side is gone.
        self.observers
            .retain(|observer| observer.send(notification).is_ok());
    }
}

/// Handle for feeding events into a spawned button event loop.
#[derive(Debug, Clone)]
pub struct ButtonHandle {
    events: mpsc::UnboundedSender<ButtonEvent>,
}

impl ButtonHandle {
    /// Deliver a touch sample from the platform gesture source.
    pub fn on_event(&self, sample: TouchSample) -> Result<()> {
        self.send(ButtonEvent::Touch(sample))
    }

    /// Programmatically force a state; one notification is suppressed.
    pub fn override_state(&self, state: AnimationState) -> Result<()> {
        self.send(ButtonEvent::Override(state))
    }

    /// Replace the configuration.
    pub fn configure(&self, config: ButtonConfig) -> Result<()> {
        self.send(ButtonEvent::Configure(config))
    }

    /// Gate whether incoming touches are processed.
    pub fn set_accepts_touches(&self, accept: bool) -> Result<()> {
        self.send(ButtonEvent::AcceptTouches(accept))
    }

    /// Stop the event loop after it drains already queued events.
    pub fn shutdown(&self) -> Result<()> {
        self.send(ButtonEvent::Shutdown)
    }

    fn send(&self, event: ButtonEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| ButtonError::ChannelClosed)
    }
}

/// Run a controller over an event channel until shutdown or channel close.
///
/// Touch samples pass through a [`TouchCollector`] so high-frequency pressure
/// updates coalesce before reaching the machine. Returns the controller so
/// callers can inspect its final state.
pub async fn button_event_loop(
    mut rx: mpsc::UnboundedReceiver<ButtonEvent>,
    mut controller: ButtonController,
) -> Result<ButtonController> {
    let mut collector = TouchCollector::new();

    loop {
        let received = if collector.is_idle() {
            match rx.recv().await {
                Some(event) => Some(event),
                None => break,
            }
        } else {
            // A pressure change is being held; wake up to flush it even when
            // the channel stays quiet.
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => Some(event),
                    None => break,
                },
                _ = tokio::time::sleep(collector.window()) => None,
            }
        };

        let mut shutdown = false;
        match received {
            Some(ButtonEvent::Touch(sample)) => collector.push(sample, Instant::now()),
            Some(ButtonEvent::LongPressTick) => controller.on_long_press_tick().await?,
            Some(ButtonEvent::Override(state)) => controller.override_state(state).await?,
            Some(ButtonEvent::Configure(config)) => {
                // A rejected configuration keeps the previous one.
                if let Err(err) = controller.configure(config) {
                    log::warn!("configuration rejected: {err}");
                }
            }
            Some(ButtonEvent::AcceptTouches(accept)) => controller.set_accepts_touches(accept),
            Some(ButtonEvent::Shutdown) => shutdown = true,
            None => {}
        }

        while let Some(sample) = collector.try_flush(Instant::now()) {
            controller.on_touch(sample).await?;
        }

        if shutdown {
            break;
        }
    }

    Ok(controller)
}

/// Spawn a button event loop wired to a tokio long-press timer.
///
/// Returns the handle for feeding events, the observer notification channel,
/// and the loop's join handle.
pub fn spawn_button(
    surface: Box<dyn RenderSurface>,
    haptics: Box<dyn HapticEngine>,
    config: ButtonConfig,
    pressure_capable: bool,
) -> Result<(
    ButtonHandle,
    mpsc::UnboundedReceiver<ButtonNotification>,
    JoinHandle<Result<ButtonController>>,
)> {
    let (tx, rx) = mpsc::unbounded_channel();
    let timer = Box::new(TokioTimer::new(tx.clone()));

    let mut controller = ButtonController::new(surface, haptics, timer, config)?;
    controller.set_pressure_capability(pressure_capable);
    let notifications = controller.subscribe();

    let task = tokio::spawn(button_event_loop(rx, controller));
    Ok((ButtonHandle { events: tx }, notifications, task))
}

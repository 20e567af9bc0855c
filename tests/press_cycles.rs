use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;

use pushbutton::haptics::LoggingHaptics;
use pushbutton::render::{NullSurface, RenderSurface};
use pushbutton::{
    spawn_button, AnimationState, Appearance, ButtonConfig, ButtonController, ButtonHandle,
    ButtonNotification, ButtonStyle, Point, Result, TouchSample,
};

const TIMEOUT_MS: u64 = 2000;

fn press_at() -> Point {
    Point::new(8.0, 8.0)
}

async fn next_notification(
    rx: &mut mpsc::UnboundedReceiver<ButtonNotification>,
) -> ButtonNotification {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("notification timed out")
        .expect("notification channel closed unexpectedly")
}

async fn expect_silence(rx: &mut mpsc::UnboundedReceiver<ButtonNotification>) {
    assert!(
        timeout(Duration::from_millis(200), rx.recv()).await.is_err(),
        "expected no notification"
    );
}

fn spawn_default() -> (
    ButtonHandle,
    mpsc::UnboundedReceiver<ButtonNotification>,
    tokio::task::JoinHandle<Result<ButtonController>>,
) {
    spawn_button(
        Box::new(NullSurface),
        Box::new(LoggingHaptics::new()),
        ButtonConfig::default(),
        false,
    )
    .expect("spawn button")
}

/// Surface that shares the transform scales it was asked to apply.
#[derive(Clone, Default)]
struct SharedSurface {
    scales: Arc<Mutex<Vec<f64>>>,
}

#[async_trait]
impl RenderSurface for SharedSurface {
    fn apply_transform(&mut self, scale: f64) -> Result<()> {
        self.scales.lock().unwrap().push(scale);
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

#[tokio::test]
async fn short_press_cycle_notifies_push_on_then_on() {
    let (handle, mut notes, task) = spawn_default();

    handle.on_event(TouchSample::began(press_at())).unwrap();
    handle.on_event(TouchSample::ended(press_at())).unwrap();

    assert_eq!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::PushOn,
            location: press_at(),
        }
    );
    assert_eq!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::On,
            location: press_at(),
        }
    );

    handle.shutdown().unwrap();
    let controller = task.await.unwrap().unwrap();
    assert_eq!(controller.current_state(), AnimationState::On);
    assert!(controller.is_enabled());
}

#[tokio::test]
async fn second_press_cycle_toggles_back_off() {
    let (handle, mut notes, task) = spawn_default();

    for _ in 0..2 {
        handle.on_event(TouchSample::began(press_at())).unwrap();
        handle.on_event(TouchSample::ended(press_at())).unwrap();
    }

    let mut states = Vec::new();
    for _ in 0..4 {
        match next_notification(&mut notes).await {
            ButtonNotification::StateChanged { state, .. } => states.push(state),
            other => panic!("unexpected notification {other:?}"),
        }
    }
    assert_eq!(
        states,
        vec![
            AnimationState::PushOn,
            AnimationState::On,
            AnimationState::PushOff,
            AnimationState::Off,
        ]
    );

    handle.shutdown().unwrap();
    let controller = task.await.unwrap().unwrap();
    assert!(!controller.is_enabled());
}

#[tokio::test(start_paused = true)]
async fn long_press_fires_then_release_forces_on() {
    let (handle, mut notes, _task) = spawn_default();

    handle.on_event(TouchSample::began(press_at())).unwrap();
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::PushOn,
            ..
        }
    ));

    // Holding past the long-press duration fires the long-press observer
    // (paused time auto-advances to the timer deadline).
    assert_eq!(
        next_notification(&mut notes).await,
        ButtonNotification::LongPressed {
            state: AnimationState::PushOn,
            location: press_at(),
        }
    );

    handle.on_event(TouchSample::ended(press_at())).unwrap();
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::On,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn long_press_overrides_the_release_direction() {
    let (handle, mut notes, task) = spawn_default();

    // Drive the control to On first.
    handle.on_event(TouchSample::began(press_at())).unwrap();
    handle.on_event(TouchSample::ended(press_at())).unwrap();
    next_notification(&mut notes).await;
    next_notification(&mut notes).await;

    // Press again and hold: release would normally land Off, but the fired
    // long press forces On.
    handle.on_event(TouchSample::began(press_at())).unwrap();
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::PushOff,
            ..
        }
    ));
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::LongPressed { .. }
    ));

    handle.on_event(TouchSample::ended(press_at())).unwrap();
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::On,
            ..
        }
    ));

    handle.shutdown().unwrap();
    let controller = task.await.unwrap().unwrap();
    assert_eq!(controller.current_state(), AnimationState::On);
}

#[tokio::test]
async fn cancelled_press_resets_silently() {
    let (handle, mut notes, task) = spawn_default();

    handle.on_event(TouchSample::began(press_at())).unwrap();
    next_notification(&mut notes).await; // PushOn

    handle.on_event(TouchSample::cancelled()).unwrap();
    expect_silence(&mut notes).await;

    // A fresh press proves the control was reset to Off: it pushes on again
    // rather than pushing off.
    handle.on_event(TouchSample::began(press_at())).unwrap();
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::PushOn,
            ..
        }
    ));

    handle.shutdown().unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn override_suppresses_exactly_one_notification() {
    let (handle, mut notes, task) = spawn_default();

    handle.override_state(AnimationState::On).unwrap();
    expect_silence(&mut notes).await;

    // The control really is On now: a press pushes toward off and notifies
    // normally again.
    handle.on_event(TouchSample::began(press_at())).unwrap();
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::PushOff,
            ..
        }
    ));

    handle.shutdown().unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn pressure_squeeze_replans_the_transform() {
    let surface = SharedSurface::default();
    let scales = surface.scales.clone();

    let (handle, mut notes, task) = spawn_button(
        Box::new(surface),
        Box::new(LoggingHaptics::new()),
        ButtonConfig::default(),
        true,
    )
    .unwrap();

    handle.on_event(TouchSample::began(press_at())).unwrap();
    next_notification(&mut notes).await; // PushOn committed

    // A soft squeeze at force 0.5 maps to a distinctive ~0.7167 scale.
    handle
        .on_event(TouchSample::changed(press_at(), Some(0.5)))
        .unwrap();
    // Give the coalescing window time to flush the held pressure change.
    tokio::time::sleep(Duration::from_millis(100)).await;

    handle.on_event(TouchSample::ended(press_at())).unwrap();
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::On,
            ..
        }
    ));

    handle.shutdown().unwrap();
    task.await.unwrap().unwrap();

    let expected = ((20.0 / 3.0 - 0.5) / 10.0f64).max(0.6) + 0.1;
    let scales = scales.lock().unwrap();
    assert!(
        scales.iter().any(|scale| (scale - expected).abs() < 1e-9),
        "expected a pressure re-plan scale of {expected} in {scales:?}"
    );
}

#[tokio::test]
async fn gated_touches_are_dropped() {
    let (handle, mut notes, task) = spawn_default();

    handle.set_accepts_touches(false).unwrap();
    handle.on_event(TouchSample::began(press_at())).unwrap();
    handle.on_event(TouchSample::ended(press_at())).unwrap();
    expect_silence(&mut notes).await;

    handle.set_accepts_touches(true).unwrap();
    handle.on_event(TouchSample::began(press_at())).unwrap();
    assert!(matches!(
        next_notification(&mut notes).await,
        ButtonNotification::StateChanged {
            state: AnimationState::PushOn,
            ..
        }
    ));

    handle.shutdown().unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn shutdown_drains_queued_events_first() {
    let (handle, mut notes, task) = spawn_default();

    handle.on_event(TouchSample::began(press_at())).unwrap();
    handle.on_event(TouchSample::ended(press_at())).unwrap();
    handle.shutdown().unwrap();

    let controller = task.await.unwrap().unwrap();
    assert_eq!(controller.current_state(), AnimationState::On);

    // Both notifications were emitted before the loop stopped.
    assert!(notes.recv().await.is_some());
    assert!(notes.recv().await.is_some());
}

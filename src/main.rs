//! pushbutton - Press Simulator
//!
//! Replays a scripted touch sequence against the button control with logging
//! collaborators, printing every observer notification.

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use pushbutton::haptics::LoggingHaptics;
use pushbutton::render::LoggingSurface;
use pushbutton::{
    spawn_button, AnimationState, ButtonConfig, ButtonHandle, ButtonNotification, ButtonStyle,
    Point, TouchSample,
};
use std::time::Duration;

/// Where simulated touches land on the control.
fn touch_point() -> Point {
    Point::new(32.0, 32.0)
}

/// One step of a press script.
#[derive(Debug, Clone, PartialEq)]
enum ScriptOp {
    /// Quick press and release.
    Tap,
    /// Press, hold for the given time, release.
    Hold(Duration),
    /// Press, ramp pressure up to `force` over the given time, release.
    Squeeze { hold: Duration, force: f64 },
    /// Press, hold, then cancel instead of releasing.
    Cancel(Duration),
    /// Programmatic state override.
    Override(AnimationState),
    /// Idle time between steps.
    Pause(Duration),
}

/// Parse a whitespace-separated press script.
///
/// Grammar: `tap | hold:<ms> | squeeze:<ms>:<force> | cancel:<ms> |
/// override:<state> | pause:<ms>`.
fn parse_script(raw: &str) -> Result<Vec<ScriptOp>> {
    let mut ops = Vec::new();

    for word in raw.split_whitespace() {
        let mut parts = word.split(':');
        let head = parts.next().unwrap_or_default();
        let op = match head {
            "tap" => ScriptOp::Tap,
            "hold" => ScriptOp::Hold(parse_millis(word, parts.next())?),
            "squeeze" => {
                let hold = parse_millis(word, parts.next())?;
                let force: f64 = parts
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("'{word}': missing force"))?
                    .parse()
                    .map_err(|_| anyhow::anyhow!("'{word}': invalid force"))?;
                ScriptOp::Squeeze { hold, force }
            }
            "cancel" => ScriptOp::Cancel(parse_millis(word, parts.next())?),
            "override" => {
                let state = parts
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("'{word}': missing state"))?
                    .parse::<AnimationState>()?;
                ScriptOp::Override(state)
            }
            "pause" => ScriptOp::Pause(parse_millis(word, parts.next())?),
            other => anyhow::bail!("unknown script step: {other}"),
        };
        ops.push(op);
    }

    Ok(ops)
}

fn parse_millis(word: &str, value: Option<&str>) -> Result<Duration> {
    let millis: u64 = value
        .ok_or_else(|| anyhow::anyhow!("'{word}': missing duration"))?
        .parse()
        .map_err(|_| anyhow::anyhow!("'{word}': invalid duration"))?;
    Ok(Duration::from_millis(millis))
}

/// Feed one script step into the control.
async fn play(handle: &ButtonHandle, op: ScriptOp) -> Result<()> {
    let at = touch_point();
    match op {
        ScriptOp::Tap => {
            handle.on_event(TouchSample::began(at))?;
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.on_event(TouchSample::ended(at))?;
        }
        ScriptOp::Hold(hold) => {
            handle.on_event(TouchSample::began(at))?;
            tokio::time::sleep(hold).await;
            handle.on_event(TouchSample::ended(at))?;
        }
        ScriptOp::Squeeze { hold, force } => {
            handle.on_event(TouchSample::began(at))?;
            let steps = (hold.as_millis() / 30).max(1) as u32;
            for step in 1..=steps {
                tokio::time::sleep(Duration::from_millis(30)).await;
                let pressure = force * f64::from(step) / f64::from(steps);
                handle.on_event(TouchSample::changed(at, Some(pressure)))?;
            }
            handle.on_event(TouchSample::ended(at))?;
        }
        ScriptOp::Cancel(hold) => {
            handle.on_event(TouchSample::began(at))?;
            tokio::time::sleep(hold).await;
            handle.on_event(TouchSample::cancelled())?;
        }
        ScriptOp::Override(state) => handle.override_state(state)?,
        ScriptOp::Pause(pause) => tokio::time::sleep(pause).await,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    let matches = Command::new("pushbutton")
        .version(pushbutton::VERSION)
        .about("Simulate press sequences against the push-button control")
        .long_about(
            "Replays a scripted touch sequence (taps, holds, pressure squeezes, \
             cancellations and overrides) through the press state machine and \
             prints every observer notification.",
        )
        .arg(
            Arg::new("script")
                .help("Press script, e.g. 'tap pause:400 hold:2500 squeeze:300:4'")
                .num_args(0..),
        )
        .arg(
            Arg::new("long-press-ms")
                .long("long-press-ms")
                .help("Long-press duration in milliseconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("2000"),
        )
        .arg(
            Arg::new("scale-multiplier")
                .long("scale-multiplier")
                .help("Multiplier applied to press scale factors")
                .value_parser(clap::value_parser!(f64))
                .default_value("1.0"),
        )
        .arg(
            Arg::new("classic")
                .long("classic")
                .help("Use the classic style instead of glow")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-haptics")
                .long("no-haptics")
                .help("Disable haptic feedback")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-3d-touch")
                .long("no-3d-touch")
                .help("Disable the pressure response")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let script_text = matches
        .get_many::<String>("script")
        .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| "tap pause:400 tap".to_string());
    let script = parse_script(&script_text)?;

    let config = ButtonConfig {
        long_press_duration: Duration::from_millis(
            *matches.get_one::<u64>("long-press-ms").expect("defaulted"),
        ),
        scale_multiplier: *matches.get_one::<f64>("scale-multiplier").expect("defaulted"),
        use_3d_touch: !matches.get_flag("no-3d-touch"),
        use_haptic_feedback: !matches.get_flag("no-haptics"),
        style: if matches.get_flag("classic") {
            ButtonStyle::Classic
        } else {
            ButtonStyle::Glow
        },
        ..ButtonConfig::default()
    };
    config.validate()?;

    let (handle, mut notifications, task) = spawn_button(
        Box::new(LoggingSurface::paced()),
        Box::new(LoggingHaptics::new()),
        config,
        true,
    )?;

    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            match notification {
                ButtonNotification::StateChanged { state, location } => {
                    println!("state changed: {state} at ({:.0}, {:.0})", location.x, location.y);
                }
                ButtonNotification::LongPressed { state, location } => {
                    println!("long pressed in {state} at ({:.0}, {:.0})", location.x, location.y);
                }
            }
        }
    });

    for op in script {
        play(&handle, op).await?;
    }

    // Let trailing animations and the glow fade settle before shutting down.
    tokio::time::sleep(Duration::from_millis(700)).await;
    handle.shutdown()?;
    let controller = task.await??;
    println!("final state: {}", controller.current_state());

    printer.abort();
    Ok(())
}

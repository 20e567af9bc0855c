//! # pushbutton - Pressable Push-Button Control Core
//!
//! A three-phase press/hold/release button control: raw touch events become a
//! sequence of discrete animation states, each transition gets computed scale
//! and glow parameters, and observers hear exactly once about every completed
//! transition. Platform concerns — pixel rendering, gesture recognition,
//! haptic hardware — stay behind collaborator traits.
//!
//! ## Features
//!
//! - **Press state machine**: Began/Changed/Ended/Cancelled phases drive an
//!   Off → PushOn → On → PushOff cycle with long-press detection
//! - **Animation planning**: pure per-transition scale/brightness/duration
//!   computation, including a pressure-sensitive (3D-touch) response curve
//! - **Haptic feedback**: impact intents fired when a press lands on On/Off
//! - **Capability degradation**: missing pressure or haptics hardware disables
//!   the feature instead of failing
//!
//! ## Architecture
//!
//! The library is organized into focused modules following modern Rust patterns:
//!
//! - [`error`] - Centralized error types and handling
//! - [`touch`] - Touch samples and pressure-burst coalescing
//! - [`press`] - The press state machine and animation states
//! - [`animation`] - Transition planning
//! - [`render`] / [`haptics`] / [`timer`] - Collaborator seams
//! - [`app`] - Button controller, event loop and handle

// Core modules
pub mod animation;
pub mod config;
pub mod error;

// Input and press handling subsystems
pub mod press;
pub mod touch;

// Collaborator seams
pub mod haptics;
pub mod render;
pub mod timer;

// Core components
pub mod app;

// Re-export commonly used types for convenience
pub use error::{ButtonError, Result};

// Public API surface for external usage
pub use app::{
    button_event_loop, spawn_button, ButtonController, ButtonEvent, ButtonHandle,
    ButtonNotification,
};
pub use config::{Appearance, ButtonConfig, ButtonStyle};
pub use press::AnimationState;
pub use touch::{Point, TouchPhase, TouchSample};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Error types and handling infrastructure for pushbutton.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! Most press-handling "failures" are policy decisions rather than errors: invalid
//! transition pairs are ignored, missing pressure samples disable the pressure
//! re-plan, and absent hardware capabilities degrade features. The variants here
//! cover the places where a collaborator or configuration can genuinely fail.

use thiserror::Error;

/// The main error type for pushbutton operations.
///
/// This enum covers configuration validation and the failure surface of the
/// collaborator traits (rendering, haptics, timer service).
#[derive(Error, Debug)]
pub enum ButtonError {
    /// Invalid configuration values (non-positive durations, out-of-range multipliers)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Rendering collaborator failures (transform or glow application)
    #[error("Render operation failed: {message}")]
    Render { message: String },

    /// Haptics collaborator failures
    #[error("Haptics operation failed: {message}")]
    Haptics { message: String },

    /// Timer service failures (scheduling the long-press timer)
    #[error("Timer operation failed: {message}")]
    Timer { message: String },

    /// The controller event channel closed while the control was still in use
    #[error("Button event channel closed")]
    ChannelClosed,

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for pushbutton operations.
///
/// This type alias provides a consistent error handling interface across
/// all modules in the pushbutton codebase.
pub type Result<T> = std::result::Result<T, ButtonError>;

impl ButtonError {
    /// Create a Config error with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a Render error with a descriptive message
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a Haptics error with a descriptive message
    pub fn haptics(message: impl Into<String>) -> Self {
        Self::Haptics {
            message: message.into(),
        }
    }

    /// Create a Timer error with a descriptive message
    pub fn timer(message: impl Into<String>) -> Self {
        Self::Timer {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// Configuration loading reads files; surface IO problems as config errors.
impl From<std::io::Error> for ButtonError {
    fn from(err: std::io::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

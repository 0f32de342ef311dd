//! # Error Types
//!
//! Custom error types for RC Link using `thiserror`.

use thiserror::Error;

/// Main error type for RC Link
#[derive(Debug, Error)]
pub enum RcLinkError {
    /// No gamepad device found on the system
    #[error("No gamepad found")]
    GamepadNotFound,

    /// Gamepad I/O errors (open, event fetch)
    #[error("Gamepad error: {0}")]
    Gamepad(String),

    /// Control frame errors (wrong datagram length)
    #[error("Control frame error: {0}")]
    Frame(String),

    /// UDP link errors (bind, send)
    #[error("Link error: {0}")]
    Link(String),

    /// PWM output errors
    #[error("PWM error: {0}")]
    Pwm(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for RC Link
pub type Result<T> = std::result::Result<T, RcLinkError>;

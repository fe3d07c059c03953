//! Custom error types for thermal profile control.
//!
//! This module provides fine-grained error handling for fan-curve parsing,
//! control-channel writes, and OS power-plan activation.

use thiserror::Error;

/// Main error type for thermal operations.
#[derive(Error, Debug)]
pub enum ThermalError {
    /// A fan-curve entry did not match `<temp>c:<percent>%`.
    #[error("Invalid fan curve entry '{entry}': {reason}")]
    InvalidCurveEntry { entry: String, reason: &'static str },

    /// Fan-curve string had no entries.
    #[error("Fan curve must have at least one point")]
    EmptyCurve,

    /// Fan-curve string had more entries than the firmware table holds.
    #[error("Fan curve has {count} points. Maximum is {max}")]
    TooManyPoints { count: usize, max: usize },

    /// Write to the ACPI control interface failed.
    #[error("Control channel write failed (control code {control_code}): {source}")]
    ChannelWrite {
        control_code: u32,
        #[source]
        source: std::io::Error,
    },

    /// OS power plan could not be activated.
    #[error("Failed to activate power plan '{plan}': {source}")]
    PowerPlan {
        plan: String,
        #[source]
        source: std::io::Error,
    },

    /// Throttle plan name not recognized.
    #[error("Unknown throttle plan '{0}'. Use: performance, turbo or silent")]
    UnknownThrottlePlan(String),

    /// Manager was given an empty profile list.
    #[error("No thermal profiles configured")]
    NoProfiles,

    /// Profile configuration could not be read or written.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ThermalError {
    /// Whether this error came from parsing a fan-curve string.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ThermalError::InvalidCurveEntry { .. }
                | ThermalError::EmptyCurve
                | ThermalError::TooManyPoints { .. }
        )
    }
}

/// Result type alias for thermal operations.
pub type Result<T> = std::result::Result<T, ThermalError>;

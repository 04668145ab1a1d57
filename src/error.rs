//! Error types
//!
//! Only configuration problems are errors. Rejected fire requests and
//! airborne actors are ordinary outcomes and never surface here.

use thiserror::Error;

/// Invalid terrain or match parameters, reported before anything is built
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("terrain width must be positive, got {width}")]
    NonPositiveWidth { width: f32 },
    #[error("terrain height must not be negative, got {height}")]
    NegativeHeight { height: f32 },
    #[error("terrain resolution must not be negative, got {resolution}")]
    NegativeResolution { resolution: i32 },
    #[error("viewport half height must be positive, got {half_height}")]
    NonPositiveViewport { half_height: f32 },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

/// Failure to load settings from disk
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

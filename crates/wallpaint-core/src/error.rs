//! Error handling for Wallpaint
//!
//! Provides error types for all layers of the application:
//! - Service errors (planner responses and transport)
//! - Animation errors (trajectories that cannot be rendered)
//! - Input errors (missing or unparseable request fields)
//! - Status errors (illegal lifecycle transitions)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Planning service error type
///
/// The `Display` text of each variant is what the user sees after "Error: ".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The service answered with a non-success status
    #[error("API Error: {detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Service-provided detail, or the status reason phrase
        detail: String,
    },

    /// No response was received
    #[error("{reason}")]
    Transport {
        /// Description of the underlying failure.
        reason: String,
    },

    /// The request did not finish within the configured timeout
    #[error("Planner request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// A success response did not contain a trajectory
    #[error("Invalid planner response: {reason}")]
    Decode {
        /// The reason decoding failed.
        reason: String,
    },

    /// The configured base URL cannot be used
    #[error("Invalid planner URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// The reason it was rejected.
        reason: String,
    },
}

impl ServiceError {
    /// HTTP status, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Animation error type
///
/// Raised when a session cannot be started for a trajectory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Wall width must be finite and positive to derive a scale
    #[error("Invalid wall width {width}: must be a positive number")]
    InvalidWallWidth {
        /// The rejected width in meters.
        width: f64,
    },

    /// Tool width must be finite and non-negative
    #[error("Invalid tool width {width}: must be a non-negative number")]
    InvalidToolWidth {
        /// The rejected width in meters.
        width: f64,
    },

    /// A waypoint contains NaN or infinite coordinates
    #[error("Waypoint {index} is not a finite coordinate")]
    NonFiniteWaypoint {
        /// Index of the waypoint in the path.
        index: usize,
    },

    /// The surface has no drawable area
    #[error("Rendering surface is empty ({width}x{height})")]
    EmptySurface {
        /// Surface width in pixels.
        width: u32,
        /// Surface height in pixels.
        height: u32,
    },
}

/// Request input error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A required field has no value
    #[error("Missing input: {field}")]
    Missing {
        /// Name of the missing field.
        field: String,
    },

    /// A field could not be parsed as a finite number
    #[error("Invalid input for {field}: '{value}'")]
    Invalid {
        /// Name of the field.
        field: String,
        /// The raw value as entered.
        value: String,
    },
}

/// Status machine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatusError {
    /// Invalid state transition
    #[error("Invalid state transition from {current} to {requested}")]
    InvalidTransition {
        /// The current state name.
        current: String,
        /// The requested state name.
        requested: String,
    },
}

/// Main error type for Wallpaint
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Planning service error
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Animation error
    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// Input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Status transition error
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a planning service error
    pub fn is_service_error(&self) -> bool {
        matches!(self, Error::Service(_))
    }

    /// Check if this is an input error
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Input(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_matches_status_line() {
        let err = ServiceError::Api {
            status: 400,
            detail: "obstacle overlaps wall boundary".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: obstacle overlaps wall boundary");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_transport_error_is_bare_reason() {
        let err = ServiceError::Transport {
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = AnimationError::InvalidWallWidth { width: 0.0 }.into();
        assert!(matches!(err, Error::Animation(_)));
        assert_eq!(
            err.to_string(),
            "Invalid wall width 0: must be a positive number"
        );

        let err: Error = InputError::Missing {
            field: "wall width".to_string(),
        }
        .into();
        assert!(err.is_input_error());
        assert!(!err.is_service_error());
    }

    #[test]
    fn test_status_error_display() {
        let err = StatusError::InvalidTransition {
            current: "Calculating".to_string(),
            requested: "Calculating".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition from Calculating to Calculating"
        );
    }
}

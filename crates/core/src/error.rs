//! Error types for the snow diorama core.
//!
//! Every operation in the core is pure numeric work over fixed-size buffers, so
//! the only failures are misconfiguration (caught at construction), a bad
//! viewport, and the spawn sampler running out of attempts.

/// Errors that can occur while building or driving a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A configuration value is out of range
    InvalidConfig {
        /// Name of the offending field (e.g. `"sphere_radius"`)
        field: &'static str,
        /// Description of the violated constraint
        message: String,
    },
    /// Viewport width or height was zero
    InvalidViewport {
        /// Requested viewport width in pixels
        width: u32,
        /// Requested viewport height in pixels
        height: u32,
    },
    /// Device pixel ratio was non-finite or not positive
    InvalidPixelRatio {
        /// Requested device pixel ratio
        ratio: f32,
    },
    /// Rejection sampling did not find a point above the snow line
    SpawnAttemptsExhausted {
        /// Number of draws made before giving up
        attempts: u32,
    },
}

impl SimulationError {
    /// Create a configuration error for `field`.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Create a configuration error for a value that must be finite and positive.
    pub fn not_positive(field: &'static str, value: f32) -> Self {
        Self::invalid_config(field, format!("must be finite and positive, got {value}"))
    }
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidConfig { field, message } => {
                write!(f, "Invalid configuration '{field}': {message}")
            }
            SimulationError::InvalidViewport { width, height } => {
                write!(f, "Invalid viewport {width}x{height}: both dimensions must be positive")
            }
            SimulationError::InvalidPixelRatio { ratio } => {
                write!(f, "Invalid device pixel ratio {ratio}: must be finite and positive")
            }
            SimulationError::SpawnAttemptsExhausted { attempts } => {
                write!(
                    f,
                    "No spawn point above the minimum height after {attempts} attempts"
                )
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimulationError::not_positive("sphere_radius", -1.0);
        assert_eq!(
            err.to_string(),
            "Invalid configuration 'sphere_radius': must be finite and positive, got -1"
        );

        let err = SimulationError::InvalidViewport {
            width: 0,
            height: 720,
        };
        assert!(err.to_string().contains("0x720"));

        let err = SimulationError::InvalidPixelRatio { ratio: -1.0 };
        assert!(err.to_string().contains("pixel ratio -1"));

        let err = SimulationError::SpawnAttemptsExhausted { attempts: 5 };
        assert!(err.to_string().contains("5 attempts"));
    }
}

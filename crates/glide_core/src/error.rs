//! Configuration errors
//!
//! The only failures visible to callers. Everything that can go wrong while
//! scrolling is absorbed by the engine and logged instead.

use thiserror::Error;

/// Reasons a scroller or one of its collaborators refuses to initialize
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{name}` must be a finite duration greater than zero (got {value})")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("`{name}` must be a finite, non-negative duration (got {value})")]
    NegativeDuration { name: &'static str, value: f64 },

    #[error("`{name}` is out of range (got {value})")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("missing required callback `{0}`")]
    MissingCallback(&'static str),

    #[error("slot size is unknown: provide a fixed slot size or a measurement callback")]
    MissingMeasurement,
}

impl ConfigError {
    /// Check that a duration is finite and strictly positive
    pub fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidDuration { name, value })
        }
    }

    /// Check that a duration is finite and zero or greater
    pub fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NegativeDuration { name, value })
        }
    }

    /// Check that a value is finite and inside `[min, max]`
    pub fn within(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange { name, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_checks() {
        assert!(ConfigError::positive("d", 10.0).is_ok());
        assert_eq!(
            ConfigError::positive("d", 0.0),
            Err(ConfigError::InvalidDuration {
                name: "d",
                value: 0.0
            })
        );
        assert!(ConfigError::positive("d", f64::INFINITY).is_err());

        assert!(ConfigError::non_negative("d", 0.0).is_ok());
        assert!(ConfigError::non_negative("d", -1.0).is_err());
        assert!(ConfigError::non_negative("d", f64::NAN).is_err());
    }

    #[test]
    fn test_range_check() {
        assert!(ConfigError::within("f", 0.5, 0.0, 1.0).is_ok());
        assert!(ConfigError::within("f", 1.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::MissingCallback("item_at");
        assert_eq!(err.to_string(), "missing required callback `item_at`");
    }
}

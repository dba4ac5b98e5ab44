//! Errors reported while validating sheet configuration.
//!
//! Everything else in this crate is total over its domain: degenerate spring
//! input has a defined zero-length settle and an unresolved release is a
//! no-op. Sequencing mistakes such as starting a running animation are
//! programming errors and panic instead of surfacing here.

use thiserror::Error;

/// Invalid [`SheetConfig`](crate::SheetConfig) or [`Spring`](crate::Spring)
/// parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A parameter that must be strictly positive was zero, negative or not
    /// finite.
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A parameter that must be non-negative was negative or not finite.
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The spring damping ratio is below one. The closed-form trajectory only
    /// models critically damped and overdamped springs.
    #[error("spring damping ratio must be at least 1, got {0}")]
    Underdamped(f64),
    /// The scrim opacity is outside `[0, 1]`.
    #[error("scrim alpha must be within [0, 1], got {0}")]
    ScrimAlpha(f64),
}

pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

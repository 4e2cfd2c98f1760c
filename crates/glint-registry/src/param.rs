//! Parameter schema for node kinds.
//!
//! Each [`ParamSpec`] declares a construction-time parameter: its valid
//! range, default, whether it must be integral, and what happens to values
//! outside the range. Runtime signal values are never checked here.

use serde::Serialize;
use thiserror::Error;

/// What to do with a value outside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutOfRange {
    /// Fail validation.
    Reject,
    /// Silently clamp into the range.
    Clamp,
}

/// Why a parameter value was refused.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParamViolation {
    /// The value is NaN or infinite.
    #[error("value {0} is not finite")]
    NotFinite(f64),
    /// An integer parameter received a fractional value.
    #[error("value {0} is not an integer")]
    NotInteger(f64),
    /// The value lies outside the declared range.
    #[error("value {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// The rejected value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },
}

/// Declared schema of one node parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    /// Parameter key as it appears in the node's `parameters` map.
    pub name: &'static str,
    /// Minimum valid value (inclusive).
    pub min: f64,
    /// Maximum valid value (inclusive).
    pub max: f64,
    /// Value used when the parameter is omitted. `None` means required.
    pub default: Option<f64>,
    /// Whether the value must be integral.
    pub integer: bool,
    /// Policy for values outside the range.
    pub out_of_range: OutOfRange,
}

impl ParamSpec {
    /// Continuous parameter with a default.
    pub const fn float(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            min,
            max,
            default: Some(default),
            integer: false,
            out_of_range: OutOfRange::Reject,
        }
    }

    /// Integer parameter with a default.
    pub const fn int(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            integer: true,
            ..Self::float(name, min, max, default)
        }
    }

    /// Marks the parameter as required (no default).
    pub const fn required(self) -> Self {
        Self {
            default: None,
            ..self
        }
    }

    /// Clamps out-of-range values instead of rejecting them.
    pub const fn clamped(self) -> Self {
        Self {
            out_of_range: OutOfRange::Clamp,
            ..self
        }
    }

    /// Returns true if the parameter has no default.
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Checks `value` against this spec and returns the value to use.
    ///
    /// Clamped parameters never fail the range check; integrality is still
    /// enforced.
    pub fn resolve(&self, value: f64) -> Result<f64, ParamViolation> {
        if !value.is_finite() {
            return Err(ParamViolation::NotFinite(value));
        }
        if self.integer && value.fract() != 0.0 {
            return Err(ParamViolation::NotInteger(value));
        }
        if value >= self.min && value <= self.max {
            return Ok(value);
        }
        match self.out_of_range {
            OutOfRange::Clamp => Ok(value.clamp(self.min, self.max)),
            OutOfRange::Reject => Err(ParamViolation::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            }),
        }
    }
}

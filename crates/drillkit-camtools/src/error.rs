//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for parameter validation
//! and program generation.

use thiserror::Error;

/// Errors that can occur during CAM tool operations.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Errors related to CAM tool parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Parameters are mutually incompatible.
    #[error("Incompatible parameters: {0}")]
    Incompatible(String),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cam_tool_error_display() {
        let err: CamToolError =
            ParameterError::Incompatible("retract below depth".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Parameter error: Incompatible parameters: retract below depth"
        );
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::OutOfRange {
            name: "line_number_width".to_string(),
            value: 0.0,
            min: 1.0,
            max: 9.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'line_number_width' out of range: 0 (valid: 1..9)"
        );

        let err = ParameterError::Incompatible("retract below depth".to_string());
        assert_eq!(err.to_string(), "Incompatible parameters: retract below depth");
    }

    #[test]
    fn test_error_conversion() {
        let param_err = ParameterError::InvalidValue {
            name: "safe_height".to_string(),
            reason: "not finite".to_string(),
        };
        let cam_err: CamToolError = param_err.into();
        assert!(matches!(cam_err, CamToolError::Parameter(_)));
    }
}

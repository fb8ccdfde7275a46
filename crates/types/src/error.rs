//! Error types for the notifications configuration

use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Parse error
    #[error("Configuration parse error: {0}")]
    ParseError(String),

    /// Missing required field
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Invalid value
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Reasons a configuration update is rejected.
///
/// A rejected update never mutates the target; the caller decides whether to
/// retry or abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// The raw candidate does not have the shape of the target type
    #[error("Configuration candidate is not a valid {target}: {message}")]
    ShapeMismatch {
        target: &'static str,
        message: String,
    },

    /// The candidate carries no service port, so the upstream read produced no data
    #[error("Service port is 0, configuration was not read successfully")]
    ServicePortUnset,
}

impl UpdateError {
    pub(crate) fn shape_mismatch(target: &'static str, err: serde_json::Error) -> Self {
        UpdateError::ShapeMismatch {
            target,
            message: err.to_string(),
        }
    }
}

/// Result type alias for configuration updates
pub type UpdateResult = std::result::Result<(), UpdateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::MissingField {
            field: "service.port".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required configuration field: service.port");

        let err = UpdateError::ServicePortUnset;
        assert!(err.to_string().contains("Service port is 0"));
    }

    #[test]
    fn test_shape_mismatch_names_target() {
        let json_err = serde_json::from_str::<u16>("\"not a port\"").unwrap_err();
        let err = UpdateError::shape_mismatch("WritableInfo", json_err);
        match &err {
            UpdateError::ShapeMismatch { target, .. } => assert_eq!(*target, "WritableInfo"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().starts_with("Configuration candidate is not a valid WritableInfo"));
    }
}

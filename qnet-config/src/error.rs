//! Error types for loading and validating network descriptions

use std::path::PathBuf;

use qnet_core::ModelError;
use thiserror::Error;
use validator::ValidationErrors;

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found error.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Field-level validation error.
    #[error("Invalid configuration:\n{}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment parsing error.
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),

    /// I/O error.
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line in a text network description.
    #[error("Parse error (file line: {line}): {message}")]
    Syntax { line: usize, message: String },

    /// The description parsed but does not form a valid network.
    #[error("Invalid network: {0}")]
    Model(#[from] ModelError),
}

impl ConfigError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ConfigError::Syntax {
            line,
            message: message.into(),
        }
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (field, errors) in errors.field_errors() {
        let _ = writeln!(output, "Field '{}':", field);
        for error in errors {
            let message = match &error.message {
                Some(msg) => msg.to_string(),
                None => error.code.to_string(),
            };
            let _ = writeln!(output, "  - {}", message);
        }
    }
    output
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

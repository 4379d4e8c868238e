use crate::domain::model::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiStatus { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{step} step has {} invalid answer(s)", errors.len())]
    ValidationError {
        step: String,
        errors: Vec<FieldError>,
    },

    #[error("Location error: {message}")]
    LocationError { message: String },

    #[error("Wizard error: {message}")]
    WizardStateError { message: String },

    #[error("Prompt error: {message}")]
    PromptError { message: String },
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Storage,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ForecastError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ForecastError::ApiError(_) | ForecastError::ApiStatus { .. } => ErrorCategory::Network,
            ForecastError::ConfigValidationError { .. }
            | ForecastError::InvalidConfigValueError { .. }
            | ForecastError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ForecastError::ValidationError { .. }
            | ForecastError::LocationError { .. }
            | ForecastError::PromptError { .. } => ErrorCategory::Input,
            ForecastError::IoError(_) | ForecastError::CsvError(_) => ErrorCategory::Storage,
            ForecastError::SerializationError(_) | ForecastError::WizardStateError { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 暫時性的網路問題，重試通常可以解決
            ForecastError::ApiError(e) if e.is_timeout() || e.is_connect() => ErrorSeverity::Medium,
            ForecastError::ApiStatus { status, .. } if *status >= 500 || *status == 429 => {
                ErrorSeverity::Medium
            }
            ForecastError::ApiError(_) | ForecastError::ApiStatus { .. } => ErrorSeverity::High,
            ForecastError::ValidationError { .. }
            | ForecastError::LocationError { .. }
            | ForecastError::PromptError { .. } => ErrorSeverity::High,
            ForecastError::ConfigValidationError { .. }
            | ForecastError::InvalidConfigValueError { .. }
            | ForecastError::MissingConfigError { .. } => ErrorSeverity::High,
            ForecastError::IoError(_)
            | ForecastError::CsvError(_)
            | ForecastError::SerializationError(_)
            | ForecastError::WizardStateError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ForecastError::ApiError(_) => {
                "Check that the forecast API is running and reachable (try --check)".to_string()
            }
            ForecastError::ApiStatus { status, .. } if *status >= 500 => {
                "The forecast service failed; retry in a moment".to_string()
            }
            ForecastError::ApiStatus { status: 429, .. } => {
                "The forecast service is rate limiting requests; wait and retry".to_string()
            }
            ForecastError::ApiStatus { .. } => {
                "Review the submitted answers; the service rejected the request".to_string()
            }
            ForecastError::ConfigValidationError { field, .. }
            | ForecastError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration file", field)
            }
            ForecastError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            ForecastError::ValidationError { step, .. } => {
                format!("Correct the highlighted answers in the [{}] section", step)
            }
            ForecastError::LocationError { .. } => {
                "Try a ZIP code or \"City, State\", or pass --lat/--lng".to_string()
            }
            ForecastError::PromptError { .. } => {
                "Run in an interactive terminal or supply an answers file with --config"
                    .to_string()
            }
            ForecastError::IoError(_) | ForecastError::CsvError(_) => {
                "Check the output path exists and is writable".to_string()
            }
            ForecastError::SerializationError(_) | ForecastError::WizardStateError { .. } => {
                "This is a bug; please report it with --verbose output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ForecastError::ApiError(e) if e.is_timeout() => {
                "The forecast service took too long to respond".to_string()
            }
            ForecastError::ApiError(_) => "Could not reach the forecast service".to_string(),
            ForecastError::ApiStatus { message, .. } => message.clone(),
            ForecastError::ValidationError { step, errors } => {
                let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                format!("Invalid {} answers: {}", step, details.join("; "))
            }
            ForecastError::LocationError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        let err = ForecastError::ApiStatus {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);

        let err = ForecastError::ApiStatus {
            status: 400,
            message: "Bad Request".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ForecastError::ValidationError {
            step: "home".to_string(),
            errors: vec![FieldError::new("TYPEHUQ", "Please select a home type.")],
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err
            .user_friendly_message()
            .contains("TYPEHUQ: Please select a home type."));
        assert!(err.recovery_suggestion().contains("[home]"));
    }
}

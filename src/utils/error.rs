use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    HttpStatusError {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Network,
            EtlError::IoError(_) | EtlError::StorageError { .. } => ErrorCategory::Storage,
            EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::UrlError(_)
            | EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 4xx on a translation lookup is routine for names the API doesn't know
            EtlError::HttpStatusError { status, .. } if status.is_client_error() => {
                ErrorSeverity::Low
            }
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorSeverity::Medium,
            EtlError::SerializationError(_) => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::StorageError { .. } => ErrorSeverity::High,
            EtlError::UrlError(_)
            | EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and that the countries API is reachable, then rerun the job"
            }
            ErrorCategory::Storage => {
                "Check storage credentials, bucket existence and write permissions"
            }
            ErrorCategory::Data => "The API response could not be decoded; inspect the payload",
            ErrorCategory::Configuration => {
                "Review the command line flags, TOML file or environment variables"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::HttpStatusError { status, url } => {
                format!("The countries API answered {} for {}", status, url)
            }
            EtlError::ApiError(e) if e.is_timeout() => {
                "The countries API did not answer in time".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

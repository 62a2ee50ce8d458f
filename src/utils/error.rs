use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {endpoint}")]
    ApiStatus { status: u16, endpoint: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed range in '{field}' of breed '{breed}': '{value}' ({reason})")]
    MalformedRange {
        breed: String,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid trait: {message}")]
    TraitError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StatsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StatsError::ApiError(_) | StatsError::ApiStatus { .. } => ErrorCategory::Network,
            StatsError::ConfigValidationError { .. }
            | StatsError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            StatsError::MalformedRange { .. }
            | StatsError::TraitError { .. }
            | StatsError::ProcessingError { .. }
            | StatsError::CsvError(_)
            | StatsError::SerializationError(_) => ErrorCategory::Data,
            StatsError::IoError(_) | StatsError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重跑即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            StatsError::ApiError(_) => {
                "Check the network connection and the API endpoint, then run again".to_string()
            }
            StatsError::ApiStatus { status, .. } if *status == 401 || *status == 403 => {
                "Check the API key (--api-key or DOG_API_KEY)".to_string()
            }
            StatsError::ApiStatus { .. } => {
                "The breed API rejected the request; verify the endpoint URL".to_string()
            }
            StatsError::MalformedRange { .. } => {
                "Re-run without --strict-ranges to skip malformed values".to_string()
            }
            StatsError::TraitError { .. } => {
                "Pass a non-empty trait name, e.g. --trait playful".to_string()
            }
            StatsError::ConfigValidationError { .. } | StatsError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and try again".to_string()
            }
            StatsError::IoError(_) | StatsError::ZipError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            StatsError::CsvError(_)
            | StatsError::SerializationError(_)
            | StatsError::ProcessingError { .. } => {
                "The API response had an unexpected shape; run with --verbose for details"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch breed data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not process breed data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Source '{source_name}' responded with HTTP {status}")]
    HttpStatusError { source_name: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to load '{path}': {reason}")]
    InputLoadError { path: String, reason: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Configuration,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 可重試 (網路類)
    Medium,
    /// 輸入或資料錯誤
    High,
    /// 配置或儲存錯誤
    Critical,
}

impl ErrorSeverity {
    /// 對應的行程結束碼，永遠非零
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Network,
            EtlError::InputLoadError { .. } => ErrorCategory::Input,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::SerializationError(_) | EtlError::ValidationError { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and that the feed URL is reachable".to_string()
            }
            EtlError::HttpStatusError { source_name, .. } => {
                format!("Verify the URL configured for source '{}'", source_name)
            }
            EtlError::InputLoadError { path, .. } => {
                format!("Make sure '{}' exists and contains a valid JSON array", path)
            }
            EtlError::ConfigValidationError { .. } => {
                "Review the configuration file syntax".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
            EtlError::IoError(_) => {
                "Check that the data directory exists and is writable".to_string()
            }
            EtlError::SerializationError(_) => {
                "The output document could not be encoded; check the seed catalog".to_string()
            }
            EtlError::ValidationError { .. } => {
                "Fix the offending seed catalog entry".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch a feed: {}", self),
            ErrorCategory::Input => format!("Could not load pipeline input: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Storage => format!("File system problem: {}", self),
            ErrorCategory::Data => format!("Invalid data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_error_is_retryable_network_error() {
        let err = EtlError::HttpStatusError {
            source_name: "GSMArena".to_string(),
            status: 404,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("GSMArena"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_input_load_error_is_fatal() {
        let err = EtlError::InputLoadError {
            path: "data/sources.json".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_ne!(err.severity().exit_code(), 0);
        assert!(err.recovery_suggestion().contains("data/sources.json"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = EtlError::InvalidConfigValueError {
            field: "fetch.timeout_secs".to_string(),
            value: "0".to_string(),
            reason: "must be between 1 and 300".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
    }
}

use thiserror::Error;

/// 模型輸出無法還原為 JSON 的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// 文字中找不到可解析的 JSON
    ParseError,
    /// JSON 可解析，但結構與預期紀錄不符
    ShapeMismatch,
}

#[derive(Error, Debug)]
pub enum PlantCareError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{provider} provider error: {message}")]
    ProviderError { provider: String, message: String },

    #[error("Malformed model response ({kind:?})")]
    MalformedResponse { kind: MalformedKind, raw: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Provider,
    Response,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlantCareError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn parse_error(raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            kind: MalformedKind::ParseError,
            raw: raw.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::ProviderError { .. } => ErrorCategory::Provider,
            Self::MalformedResponse { .. } | Self::SerializationError(_) => {
                ErrorCategory::Response
            }
            Self::InvalidInput { .. } | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Response => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Provider => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "Check your network connection and try again",
            Self::ProviderError { .. } => {
                "The upstream service is unavailable or rejected the request; verify the API key and retry later"
            }
            Self::MalformedResponse { .. } | Self::SerializationError(_) => {
                "Retry the request; the model occasionally returns unstructured text"
            }
            Self::InvalidInput { .. } => "Use a JPEG, PNG, GIF, BMP or WEBP image",
            Self::ValidationError { .. } => "Fill in every required field and try again",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file for typos and invalid values"
            }
            Self::MissingConfigError { .. } => {
                "Set the missing value in the configuration file or the matching environment variable"
            }
            Self::IoError(_) => "Check that the file exists and is readable",
        }
    }

    /// CLI 退出碼，依嚴重程度決定。失敗時沒有任何輸出，所以一律非 0
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Medium => 2,   // 重試錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
            ErrorSeverity::Low => 4,      // 回應無法使用
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) => "Could not reach an external service".to_string(),
            Self::ProviderError { provider, .. } => {
                format!("The {} service returned an error", provider)
            }
            Self::MalformedResponse { .. } | Self::SerializationError(_) => {
                "The assistant returned an unreadable answer".to_string()
            }
            Self::InvalidInput { message } => format!("Invalid input: {}", message),
            Self::ValidationError { field, message } => format!("{}: {}", field, message),
            Self::MissingConfigError { field } => {
                format!("Configuration value '{}' is missing", field)
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
            Self::IoError(e) => format!("File error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlantCareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let err = PlantCareError::provider("gemini", "quota exceeded");
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert_eq!(err.severity(), ErrorSeverity::Medium);

        let err = PlantCareError::parse_error("not json");
        assert_eq!(err.category(), ErrorCategory::Response);
        assert_eq!(err.severity(), ErrorSeverity::Low);

        let err = PlantCareError::MissingConfigError {
            field: "gemini.api_key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_user_friendly_message_names_provider() {
        let err = PlantCareError::provider("weather", "city not found");
        assert_eq!(
            err.user_friendly_message(),
            "The weather service returned an error"
        );
        assert_eq!(
            err.to_string(),
            "weather provider error: city not found"
        );
    }

    #[test]
    fn test_every_failure_exits_non_zero() {
        let serialization: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = [
            PlantCareError::SerializationError(serialization),
            PlantCareError::parse_error("not json"),
            PlantCareError::provider("gemini", "quota"),
            PlantCareError::ValidationError {
                field: "days".to_string(),
                message: "must be at least 1".to_string(),
            },
            PlantCareError::IoError(std::io::Error::other("disk")),
        ];

        for err in &errors {
            assert_ne!(err.exit_code(), 0, "{err} exited with 0");
        }
        assert_eq!(errors[0].severity(), ErrorSeverity::Low);
        assert_eq!(errors[2].exit_code(), 2);
        assert_eq!(errors[3].exit_code(), 1);
        assert_eq!(errors[4].exit_code(), 3);
    }

    #[test]
    fn test_malformed_response_keeps_raw_text() {
        match PlantCareError::parse_error("garbage") {
            PlantCareError::MalformedResponse { kind, raw } => {
                assert_eq!(kind, MalformedKind::ParseError);
                assert_eq!(raw, "garbage");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

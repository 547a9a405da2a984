use crate::domain::graphql::GraphQLError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PcaError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    HttpStatusError { status: u16, body: String },

    #[error("GraphQL request returned errors: {}", summarize(.errors))]
    GraphQLErrors { errors: Vec<GraphQLError> },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Query template not found: {kind} '{name}'")]
    TemplateNotFound { kind: String, name: String },

    #[error("Query build error: {message}")]
    QueryBuildError { message: String },

    #[error("Unable to map result to {target}: {message}")]
    MappingError { target: String, message: String },

    #[error("Unable to parse CM URI '{uri}': {reason}")]
    InvalidCmUri { uri: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, PcaError>;

fn summarize(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    GraphQL,
    Template,
    Mapping,
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

impl ErrorSeverity {
    /// CLI 結束碼，任何錯誤都不為 0。Low 目前只有取消，沿用 SIGINT 的 130
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 130,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl PcaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PcaError::ApiError(_) | PcaError::HttpStatusError { .. } | PcaError::Cancelled => {
                ErrorCategory::Network
            }
            PcaError::GraphQLErrors { .. } => ErrorCategory::GraphQL,
            PcaError::TemplateNotFound { .. }
            | PcaError::QueryBuildError { .. }
            | PcaError::PatternError(_) => ErrorCategory::Template,
            PcaError::SerializationError(_)
            | PcaError::MappingError { .. }
            | PcaError::InvalidCmUri { .. } => ErrorCategory::Mapping,
            PcaError::ConfigError { .. }
            | PcaError::ConfigValidationError { .. }
            | PcaError::InvalidConfigValueError { .. }
            | PcaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PcaError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PcaError::Cancelled => ErrorSeverity::Low,
            PcaError::ApiError(_) | PcaError::HttpStatusError { .. } => ErrorSeverity::Medium,
            PcaError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 傳輸層暫時性錯誤可以重試；重試策略由呼叫端決定
    pub fn is_retryable(&self) -> bool {
        match self {
            PcaError::ApiError(e) => e.is_timeout() || e.is_connect(),
            PcaError::HttpStatusError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the content service endpoint is reachable and the timeout is large enough"
            }
            ErrorCategory::GraphQL => {
                "Check the request arguments (publication id, URL, filters) against the content service schema"
            }
            ErrorCategory::Template => {
                "Check the query template name and the templates_dir override, if one is configured"
            }
            ErrorCategory::Mapping => {
                "The response did not match the expected content model; verify the template selects the required fields"
            }
            ErrorCategory::Configuration => "Fix the configuration file and try again",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PcaError::ApiError(e) if e.is_timeout() => {
                "The content service did not answer in time".to_string()
            }
            PcaError::ApiError(_) => "Could not reach the content service".to_string(),
            PcaError::HttpStatusError { status, .. } => {
                format!("The content service rejected the request (HTTP {})", status)
            }
            PcaError::Cancelled => "The request was cancelled".to_string(),
            PcaError::GraphQLErrors { .. } => format!("The content service reported: {}", self),
            PcaError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_errors_display_joins_messages() {
        let err = PcaError::GraphQLErrors {
            errors: vec![
                GraphQLError::new("Publication not found"),
                GraphQLError::new("Invalid namespace"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "GraphQL request returned errors: Publication not found; Invalid namespace"
        );
        assert_eq!(err.category(), ErrorCategory::GraphQL);
    }

    #[test]
    fn test_retryable_status_codes() {
        let server_error = PcaError::HttpStatusError {
            status: 503,
            body: String::new(),
        };
        let client_error = PcaError::HttpStatusError {
            status: 400,
            body: String::new(),
        };
        assert!(server_error.is_retryable());
        assert!(!client_error.is_retryable());
        assert_eq!(server_error.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_config_errors_are_configuration_category() {
        let err = PcaError::MissingConfigError {
            field: "client.endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("client.endpoint"));
    }

    #[test]
    fn test_every_severity_exits_non_zero() {
        for severity in [
            ErrorSeverity::Low,
            ErrorSeverity::Medium,
            ErrorSeverity::High,
            ErrorSeverity::Critical,
        ] {
            assert_ne!(severity.exit_code(), 0, "{:?}", severity);
        }
        assert_eq!(PcaError::Cancelled.severity().exit_code(), 130);
    }
}

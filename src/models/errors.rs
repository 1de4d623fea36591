//! Centralized Error Handling Module
//!
//! Every failure flowing out of the scan pipeline carries a unique code so
//! host applications can map it onto their own responses and logs.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - VALIDATION_xxx: malformed input or feature data
//! - TIMEOUT_xxx: feature resolution exceeded its budget
//! - PROVIDER_xxx / PERSISTENCE_xxx: external collaborators
//! - CFG_xxx: configuration errors

use std::fmt;

use serde::Serialize;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Per-field details (populated for validation failures)
    pub field_errors: Vec<FieldError>,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: Vec::new(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Coarse failure kind visible to callers
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)?;
        for err in &self.field_errors {
            write!(f, "; {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Caller-facing failure kinds.
///
/// `Validation` and `Timeout` are the two terminal kinds a scan can end with;
/// everything else comes from collaborators or the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Timeout,
    Collaborator,
    Internal,
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Validation Errors
    // ============================================
    /// Feature bundle failed schema validation
    ValidationFailed,
    /// Address empty, too short or malformed
    InvalidAddress,
    /// Network not in the supported set
    UnsupportedNetwork,

    // ============================================
    // Timeout Errors
    // ============================================
    /// Feature resolution exceeded the configured timeout
    FeatureTimeout,

    // ============================================
    // Collaborator Errors
    // ============================================
    /// Feature provider returned an error
    ProviderFailed,
    /// Persistence port rejected the scan
    PersistenceFailed,

    // ============================================
    // Runtime / Configuration Errors
    // ============================================
    /// A scoring task panicked or was cancelled
    ModelTaskFailed,
    /// Invalid configuration value
    ConfigInvalidValue,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_ERROR",
            Self::InvalidAddress => "VALIDATION_INVALID_ADDRESS",
            Self::UnsupportedNetwork => "VALIDATION_UNSUPPORTED_NETWORK",
            Self::FeatureTimeout => "TIMEOUT_ERROR",
            Self::ProviderFailed => "PROVIDER_FAILED",
            Self::PersistenceFailed => "PERSISTENCE_FAILED",
            Self::ModelTaskFailed => "MODEL_TASK_FAILED",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed | Self::InvalidAddress | Self::UnsupportedNetwork => {
                ErrorKind::Validation
            }
            Self::FeatureTimeout => ErrorKind::Timeout,
            Self::ProviderFailed | Self::PersistenceFailed => ErrorKind::Collaborator,
            Self::ModelTaskFailed | Self::ConfigInvalidValue => ErrorKind::Internal,
        }
    }

    /// HTTP status a web layer should answer with
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Timeout => 503,
            ErrorKind::Collaborator => 502,
            ErrorKind::Internal => 500,
        }
    }

    /// Check if error is retryable by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FeatureTimeout | Self::ProviderFailed)
    }
}

/// Machine-readable reason a single field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    InvalidType,
    TooSmall,
    TooBig,
    NotInteger,
    NotFinite,
    Required,
}

impl FieldErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_type",
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::NotInteger => "not_integer",
            Self::NotFinite => "not_finite",
            Self::Required => "required",
        }
    }
}

/// One failed field, addressed by its dotted path (e.g. `holderDistribution.top10Percent`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
    pub code: FieldErrorCode,
}

impl FieldError {
    pub fn new(path: impl Into<String>, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.message, self.code.as_str())
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Schema validation failed on one or more fields
    pub fn validation(field_errors: Vec<FieldError>) -> Self {
        let message = format!("Feature validation failed on {} field(s)", field_errors.len());
        Self {
            code: ErrorCode::ValidationFailed,
            message,
            field_errors,
            source: None,
        }
    }

    /// Invalid address
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        let message = msg.into();
        Self {
            field_errors: vec![FieldError::new(
                "address",
                FieldErrorCode::InvalidType,
                message.clone(),
            )],
            ..Self::new(ErrorCode::InvalidAddress, message)
        }
    }

    /// Unsupported network
    pub fn unsupported_network(network: &str) -> Self {
        let message = format!("Unsupported network: {}", network);
        Self {
            field_errors: vec![FieldError::new(
                "network",
                FieldErrorCode::InvalidType,
                message.clone(),
            )],
            ..Self::new(ErrorCode::UnsupportedNetwork, message)
        }
    }

    /// Feature resolution timed out
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::new(
            ErrorCode::FeatureTimeout,
            format!("Feature extraction exceeded {}ms", timeout_ms),
        )
    }

    /// Feature provider failure
    pub fn provider_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProviderFailed, msg)
    }

    /// Persistence port failure
    pub fn persistence_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::PersistenceFailed, msg)
    }

    /// Invalid configuration value
    pub fn config_invalid(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {}", key, value),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let path = String::from("$");
        let message = err.to_string();
        Self {
            field_errors: vec![FieldError::new(path, FieldErrorCode::InvalidType, message)],
            ..Self::with_source(ErrorCode::ValidationFailed, "JSON parse error", err)
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::with_source(ErrorCode::ModelTaskFailed, "Scoring task failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::timeout(15_000);
        assert_eq!(err.code, ErrorCode::FeatureTimeout);
        assert_eq!(err.code_str(), "TIMEOUT_ERROR");
        assert!(err.is_timeout());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::FeatureTimeout.is_retryable());
        assert!(ErrorCode::ProviderFailed.is_retryable());
        assert!(!ErrorCode::ValidationFailed.is_retryable());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), 400);
        assert_eq!(ErrorCode::InvalidAddress.http_status(), 400);
        assert_eq!(ErrorCode::FeatureTimeout.http_status(), 503);
        assert_eq!(ErrorCode::ModelTaskFailed.http_status(), 500);
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = AppError::validation(vec![FieldError::new(
            "liquidityRatio",
            FieldErrorCode::TooBig,
            "must be <= 1",
        )]);
        let text = err.to_string();
        assert!(text.starts_with("[VALIDATION_ERROR]"));
        assert!(text.contains("liquidityRatio: must be <= 1 (too_big)"));
    }

    #[test]
    fn test_address_error_is_validation() {
        let err = AppError::invalid_address("Address is empty");
        assert!(err.is_validation());
        assert_eq!(err.field_errors[0].path, "address");
    }
}

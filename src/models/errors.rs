//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code, which keeps production
//! log monitoring simple.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - QUIZ_xxx: quiz session / sequencer errors
//! - LEAD_xxx: lead-capture errors
//! - API_xxx: API errors
//! - CFG_xxx: configuration errors
//! - BACKEND_xxx: hosted backend errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
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
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Quiz Session Errors
    // ============================================
    /// Option id does not belong to the referenced question
    QuizInvalidOption,
    /// Question id is not in the currently active sequence
    QuizQuestionNotActive,
    /// Session already handed off its answers (terminal state)
    QuizSessionComplete,
    /// No session with the given id
    QuizSessionNotFound,
    /// Session timed out and was swept
    QuizSessionExpired,

    // ============================================
    // Lead-Capture Errors
    // ============================================
    /// Email failed boundary validation
    LeadInvalidEmail,
    /// Email already on the waitlist (unique violation)
    LeadDuplicateSignup,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,
    /// Resource not found
    ApiNotFound,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Hosted Backend Errors
    // ============================================
    /// Backend unreachable
    BackendUnavailable,
    /// Backend rejected the write
    BackendRejected,
    /// Backend request timeout
    BackendTimeout,
    /// Backend returned an unparseable response
    BackendInvalidResponse,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Quiz Session Errors
            Self::QuizInvalidOption => "QUIZ_INVALID_OPTION",
            Self::QuizQuestionNotActive => "QUIZ_QUESTION_NOT_ACTIVE",
            Self::QuizSessionComplete => "QUIZ_SESSION_COMPLETE",
            Self::QuizSessionNotFound => "QUIZ_SESSION_NOT_FOUND",
            Self::QuizSessionExpired => "QUIZ_SESSION_EXPIRED",

            // Lead-Capture Errors
            Self::LeadInvalidEmail => "LEAD_INVALID_EMAIL",
            Self::LeadDuplicateSignup => "LEAD_DUPLICATE_SIGNUP",

            // API Errors
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ApiNotFound => "API_NOT_FOUND",

            // Configuration Errors
            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            // Hosted Backend Errors
            Self::BackendUnavailable => "BACKEND_UNAVAILABLE",
            Self::BackendRejected => "BACKEND_REJECTED",
            Self::BackendTimeout => "BACKEND_TIMEOUT",
            Self::BackendInvalidResponse => "BACKEND_INVALID_RESPONSE",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest
            | Self::QuizInvalidOption
            | Self::QuizQuestionNotActive
            | Self::LeadInvalidEmail
            | Self::ConfigInvalidValue => 400,
            Self::ApiNotFound | Self::QuizSessionNotFound | Self::QuizSessionExpired => 404,
            Self::QuizSessionComplete | Self::LeadDuplicateSignup => 409,
            Self::ApiRateLimited => 429,
            Self::BackendUnavailable | Self::BackendTimeout => 502,
            _ => 500,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable | Self::BackendTimeout | Self::ApiRateLimited
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Option id not in the question's option list
    pub fn invalid_option(question_id: &str, option_id: &str) -> Self {
        Self::new(
            ErrorCode::QuizInvalidOption,
            format!("Option '{}' does not belong to question '{}'", option_id, question_id),
        )
    }

    /// Question not in the active sequence
    pub fn question_not_active(question_id: &str) -> Self {
        Self::new(
            ErrorCode::QuizQuestionNotActive,
            format!("Question '{}' is not in the active sequence", question_id),
        )
    }

    /// Session is terminal
    pub fn session_complete() -> Self {
        Self::new(
            ErrorCode::QuizSessionComplete,
            "Quiz session already completed; answers are read-only",
        )
    }

    /// Unknown session id
    pub fn session_not_found(session_id: &str) -> Self {
        Self::new(
            ErrorCode::QuizSessionNotFound,
            format!("No quiz session with id {}", session_id),
        )
    }

    /// Session swept by TTL
    pub fn session_expired(session_id: &str) -> Self {
        Self::new(
            ErrorCode::QuizSessionExpired,
            format!("Quiz session {} expired", session_id),
        )
    }

    /// Invalid email at signup boundary
    pub fn invalid_email(email: &str) -> Self {
        Self::new(ErrorCode::LeadInvalidEmail, format!("Invalid email address: {}", email))
    }

    /// Email already on the waitlist
    pub fn duplicate_signup(email: &str) -> Self {
        Self::new(
            ErrorCode::LeadDuplicateSignup,
            format!("{} is already on the waitlist", email),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    /// Missing environment variable
    pub fn missing_env(var: &str) -> Self {
        Self::new(ErrorCode::ConfigMissingEnv, format!("Missing environment variable: {}", var))
    }

    /// Backend rejected a write
    pub fn backend_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendRejected, msg)
    }

    /// Backend unreachable
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendUnavailable, msg)
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

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::BackendTimeout, "Backend request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::BackendUnavailable, "Backend connection failed")
        } else {
            Self::new(ErrorCode::Unknown, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::BackendInvalidResponse, "JSON parse error", err)
    }
}

/// Application Error Handling
///
/// Every failure in the service maps onto one of four outcomes:
/// 1. Malformed input (400)
/// 2. Unauthorized: missing, invalid or expired credential (401, uniform)
/// 3. Forbidden: authenticated but not entitled to the resource (403)
/// 4. Infrastructure failure: store, hashing, signing or randomness (5xx)
///
/// Authentication failures keep their precise internal reason for the
/// server-side log, while the HTTP response never reveals which check failed.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

// ----------------------------------------------------------------------------
// Domain errors
// ----------------------------------------------------------------------------

/// Validation errors for input data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(String),
    TooShort(String, usize),
    TooLong(String, usize),
    InvalidFormat(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
        }
    }
}

impl StdError for ValidationError {}

/// Store operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Authentication and authorization errors
///
/// Every variant except `Forbidden` is reported to clients as the same
/// `401 Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header present
    MissingHeader,
    /// `Authorization` header not of the exact `<Scheme> <credential>` shape
    MalformedHeader,
    /// Access token failed signature, expiry, issuer or subject checks
    TokenInvalid,
    /// Refresh token unknown, revoked or expired
    RefreshTokenInvalid,
    /// Email unknown or password mismatch
    InvalidCredentials,
    /// Webhook API key does not match the configured key
    InvalidApiKey,
    /// Authenticated caller does not own the resource
    Forbidden,
}

impl AuthError {
    /// True for every failure that must surface as `Unauthorized`
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, AuthError::Forbidden)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header not found"),
            AuthError::MalformedHeader => write!(f, "Invalid authorization header format"),
            AuthError::TokenInvalid => write!(f, "Invalid or expired access token"),
            AuthError::RefreshTokenInvalid => write!(f, "Refresh token is unknown, revoked or expired"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::InvalidApiKey => write!(f, "Invalid API key"),
            AuthError::Forbidden => write!(f, "Access to this resource is denied"),
        }
    }
}

impl StdError for AuthError {}

/// Error type returned by every handler
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Database(DatabaseError),
    Auth(AuthError),
    /// Hashing, signing or random-source failure
    Internal(String),
}

impl AppError {
    /// True when the failure comes from the infrastructure rather than the caller
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                AppError::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                AppError::Database(DatabaseError::ConnectionPool(err.to_string()))
            }
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::Database(DatabaseError::UniqueConstraintViolation(
                    "Email already registered".to_string(),
                ))
            }
            _ => AppError::Database(DatabaseError::UnexpectedError(err.to_string())),
        }
    }
}

// ----------------------------------------------------------------------------
// HTTP mapping
// ----------------------------------------------------------------------------

/// JSON body of every error response
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Also present on the server-side log line
    pub error_id: String,
    pub message: String,
    pub code: &'static str,
    pub status: u16,
    pub timestamp: String,
}

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                (StatusCode::CONFLICT, "DUPLICATE_ENTRY")
            }
            AppError::Database(DatabaseError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Database(DatabaseError::ConnectionPool(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AppError::Database(DatabaseError::UnexpectedError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            AppError::Auth(AuthError::Forbidden) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Client-facing message; auth and infrastructure detail stays in the log
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Database(e @ DatabaseError::UniqueConstraintViolation(_))
            | AppError::Database(e @ DatabaseError::NotFound(_)) => e.to_string(),
            AppError::Database(DatabaseError::ConnectionPool(_)) => {
                "Database service temporarily unavailable".to_string()
            }
            AppError::Database(DatabaseError::UnexpectedError(_)) => {
                "Database error occurred".to_string()
            }
            AppError::Auth(AuthError::Forbidden) => "Forbidden".to_string(),
            AppError::Auth(_) => "Unauthorized".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn to_response_body(&self, error_id: &str) -> ErrorResponse {
        let (status, code) = self.classify();
        ErrorResponse {
            error_id: error_id.to_string(),
            message: self.public_message(),
            code,
            status: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn trace(&self, error_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(error_id, error = %e, "Validation error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                tracing::warn!(error_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Database(DatabaseError::NotFound(_)) => {
                tracing::info!(error_id, error = %self, "Resource not found");
            }
            AppError::Database(e) => {
                tracing::error!(error_id, error = %e, "Database error");
            }
            AppError::Auth(AuthError::Forbidden) => {
                tracing::warn!(error_id, "Access denied");
            }
            AppError::Auth(e) => {
                tracing::warn!(error_id, reason = %e, "Authentication failed");
            }
            AppError::Internal(msg) => {
                tracing::error!(error_id, error = %msg, "Internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.trace(&error_id);
        HttpResponse::build(self.status_code()).json(self.to_response_body(&error_id))
    }
}

/// Per-operation context attached to success and failure log lines
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub user_id: Option<String>,
    pub operation: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            operation: operation.into(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_user_id(mut self, user_id: impl ToString) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn log_error(&self, error: &AppError) {
        let context = serde_json::json!({
            "request_id": self.request_id,
            "operation": self.operation,
            "user_id": self.user_id,
            "timestamp": self.timestamp.to_rfc3339(),
        });

        if error.is_infrastructure() {
            tracing::error!(error = %error, context = ?context, "Operation failed");
        } else {
            tracing::warn!(error = %error, context = ?context, "Operation rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_reaches_client() {
        let err: AppError = ValidationError::TooLong("body".to_string(), 140).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_response_body("req-0").message,
            "body is too long (maximum 140 characters)"
        );
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = AuthError::TokenInvalid.into();
        assert!(matches!(app_err, AppError::Auth(AuthError::TokenInvalid)));
        assert!(!app_err.is_infrastructure());
    }

    #[test]
    fn test_every_auth_failure_is_a_uniform_401() {
        let failures = [
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::TokenInvalid,
            AuthError::RefreshTokenInvalid,
            AuthError::InvalidCredentials,
            AuthError::InvalidApiKey,
        ];

        for failure in failures {
            let err = AppError::Auth(failure);
            let body = err.to_response_body("req-1");
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(body.code, "UNAUTHORIZED");
            assert_eq!(body.message, "Unauthorized");
        }
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let err = AppError::Auth(AuthError::Forbidden);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_response_body("req-3").code, "FORBIDDEN");
        assert!(!AuthError::Forbidden.is_unauthorized());
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = AppError::Internal("random source exhausted".to_string());
        let body = err.to_response_body("req-2");
        assert_eq!(body.status, 500);
        assert!(!body.message.contains("random"));
        assert!(err.is_infrastructure());
    }

    #[test]
    fn test_error_context_creation() {
        let ctx = ErrorContext::new("test_operation");
        assert_eq!(ctx.operation, "test_operation");
        assert!(ctx.user_id.is_none());

        let ctx_with_user = ctx.with_user_id("user-123");
        assert_eq!(ctx_with_user.user_id, Some("user-123".to_string()));
    }
}

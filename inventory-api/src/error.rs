use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The token has expired")]
    TokenExpired,

    #[error("Signature verification failed")]
    TokenInvalid,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Token is not fresh")]
    FreshnessRequired,

    #[error("Request does not contain an access token")]
    AuthorizationRequired,

    #[error("Invalid credentials")]
    CredentialsInvalid,

    #[error("A user with that username already exists")]
    DuplicateUsername,

    #[error("Password has been breached")]
    PasswordBreached,

    #[error("Upstream service unavailable")]
    UpstreamUnavailable,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Admin privilege required")]
    AdminRequired,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Wire shape for every error response. `error` is a stable code clients
/// can branch on; `message` is human-readable.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    /// Stable wire code for programmatic handling by clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::TokenExpired => "token_expired",
            ApiError::TokenInvalid => "invalid_token",
            ApiError::TokenRevoked => "token_revoked",
            ApiError::FreshnessRequired => "fresh_token_required",
            ApiError::AuthorizationRequired => "authorization_required",
            ApiError::CredentialsInvalid => "invalid_credentials",
            ApiError::DuplicateUsername => "duplicate_username",
            ApiError::PasswordBreached => "password_breached",
            ApiError::UpstreamUnavailable => "upstream_unavailable",
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::AdminRequired => "admin_required",
            ApiError::Database(_) | ApiError::Redis(_) | ApiError::Internal(_) => "internal_error",
        }
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Database(_) | ApiError::Redis(_) | ApiError::Internal(_)
        )
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TokenExpired
            | ApiError::TokenInvalid
            | ApiError::TokenRevoked
            | ApiError::FreshnessRequired
            | ApiError::AuthorizationRequired
            | ApiError::CredentialsInvalid => StatusCode::UNAUTHORIZED,
            ApiError::AdminRequired => StatusCode::FORBIDDEN,
            ApiError::DuplicateUsername | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PasswordBreached | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Redis(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage-layer faults surface as a generic internal error; every
        // other failure carries its structured reason.
        let message = if self.is_internal() {
            tracing::error!(error = %self, "Internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.code(),
            message,
        })
    }
}

// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_are_unauthorized() {
        for err in [
            ApiError::TokenExpired,
            ApiError::TokenInvalid,
            ApiError::TokenRevoked,
            ApiError::FreshnessRequired,
            ApiError::AuthorizationRequired,
            ApiError::CredentialsInvalid,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_missing_token_distinct_from_invalid_token() {
        assert_ne!(
            ApiError::AuthorizationRequired.code(),
            ApiError::TokenInvalid.code()
        );
    }

    #[test]
    fn test_internal_errors_share_generic_code() {
        let err = ApiError::Internal("pool exhausted".to_string());
        assert_eq!(err.code(), "internal_error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_revocation_outage_maps_to_service_unavailable() {
        assert_eq!(
            ApiError::UpstreamUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}

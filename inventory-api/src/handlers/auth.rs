/// Authentication handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    db::{self, user_repo},
    error::ApiError,
    metrics,
    middleware::AuthContext,
    security::password,
    AppState,
};
use job_queue::NotificationJob;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 80))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username or email address.
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Login response with tokens
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body with a stable `error` code
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Register endpoint handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Password breached or invalid input", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse)
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;

    if user_repo::username_or_email_exists(&state.db, &payload.username, &payload.email).await? {
        return Err(ApiError::DuplicateUsername);
    }

    // Breach lookup is advisory: a positive match always rejects, but an
    // unavailable corpus must not block account creation.
    match state.breach.is_breached(&payload.password).await {
        Ok(true) => return Err(ApiError::PasswordBreached),
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Breach check unavailable; skipping");
        }
    }

    let password_hash = password::hash_password(&payload.password)?;

    let user = user_repo::create_user(&state.db, &payload.username, &payload.email, &password_hash)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ApiError::DuplicateUsername
            } else {
                e.into()
            }
        })?;

    tracing::info!(user_id = user.id, "User registered");

    // The user row exists; the welcome email is best-effort side work
    // handled by the worker, so an enqueue failure is not a registration
    // failure.
    let job = NotificationJob::registration_email(&user.email, &user.username);
    match state.queue.enqueue(&job).await {
        Ok(job_id) => {
            metrics::JOBS_ENQUEUED.inc();
            tracing::info!(user_id = user.id, %job_id, "Welcome notification enqueued");
        }
        Err(e) => {
            tracing::error!(user_id = user.id, error = %e, "Failed to enqueue welcome notification");
        }
    }

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "User created.".to_string(),
    }))
}

/// Login endpoint handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;

    let user = user_repo::find_by_username_or_email(&state.db, &payload.username)
        .await?
        .ok_or(ApiError::CredentialsInvalid)?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(ApiError::CredentialsInvalid);
    }

    // Access token is fresh: it came straight from a password login.
    let access_token = state.tokens.issue_access_token(user.id, true)?;
    let refresh_token = state.tokens.issue_refresh_token(user.id)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
    }))
}

/// Refresh token endpoint handler. Routed behind the refresh-type gate.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Auth",
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Token invalid, expired or already used", body = ErrorResponse)
    )
)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    ctx: AuthContext,
) -> Result<HttpResponse, ApiError> {
    // Rotation by revocation: a refresh token is single-use. The atomic
    // consume admits exactly one winner when the same token is replayed
    // concurrently.
    let consumed = state
        .revocation
        .consume(&ctx.jti, ctx.remaining_ttl_secs())
        .await
        .map_err(|_| ApiError::UpstreamUnavailable)?;

    if !consumed {
        return Err(ApiError::TokenRevoked);
    }

    // The derived access token is never fresh.
    let access_token = state.tokens.issue_access_token(ctx.user_id, false)?;

    tracing::info!(user_id = ctx.user_id, "Token refreshed");

    Ok(HttpResponse::Ok().json(RefreshResponse { access_token }))
}

/// Logout endpoint handler. Routed behind the access-type gate.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn logout(
    state: web::Data<AppState>,
    ctx: AuthContext,
) -> Result<HttpResponse, ApiError> {
    state
        .revocation
        .revoke(&ctx.jti, ctx.remaining_ttl_secs())
        .await
        .map_err(|_| ApiError::UpstreamUnavailable)?;

    tracing::info!(user_id = ctx.user_id, "User logged out");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User logged out".to_string(),
    }))
}

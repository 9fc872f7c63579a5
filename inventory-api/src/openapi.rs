use utoipa::OpenApi;

use crate::handlers::auth::{
    ErrorResponse, LoginRequest, LoginResponse, MessageResponse, RefreshResponse, RegisterRequest,
};

/// OpenAPI document covering the auth surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::refresh_token,
        crate::handlers::auth::logout
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        RefreshResponse,
        MessageResponse,
        ErrorResponse
    )),
    tags(
        (name = "Auth", description = "Authentication & token APIs")
    )
)]
pub struct ApiDoc;

/// User lookup and deletion
use actix_web::{web, HttpResponse};

use crate::{db::user_repo, error::ApiError, AppState};

use super::auth::MessageResponse;

pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = user_repo::find_by_id(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Deleting a user does not revoke tokens already issued to it; they
/// remain valid until expiry or explicit revocation.
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let removed = user_repo::delete(&state.db, user_id).await?;

    if removed == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id, "User deleted");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User deleted.".to_string(),
    }))
}

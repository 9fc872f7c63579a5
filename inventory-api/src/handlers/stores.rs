/// Store CRUD
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::{
    db::{self, store_repo},
    error::ApiError,
    AppState,
};

use super::auth::MessageResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoreRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

pub async fn create_store(
    state: web::Data<AppState>,
    payload: web::Json<CreateStoreRequest>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;

    let store = store_repo::create_store(&state.db, &payload.name)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ApiError::Conflict("A store with that name already exists".to_string())
            } else {
                e.into()
            }
        })?;

    Ok(HttpResponse::Created().json(store))
}

pub async fn list_stores(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let stores = store_repo::list(&state.db).await?;
    Ok(HttpResponse::Ok().json(stores))
}

pub async fn get_store(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let store = store_repo::find_by_id(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))?;

    Ok(HttpResponse::Ok().json(store))
}

pub async fn delete_store(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let removed = store_repo::delete(&state.db, path.into_inner()).await?;

    if removed == 0 {
        return Err(ApiError::NotFound("Store not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Store deleted.".to_string(),
    }))
}

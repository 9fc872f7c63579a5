/// Item CRUD
///
/// Creation requires a fresh token (routed behind the fresh gate);
/// deletion is the one admin-gated operation in the system.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::{
    db::{item_repo, store_repo},
    error::ApiError,
    middleware::AuthContext,
    AppState,
};

use super::auth::MessageResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    pub store_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub price: f64,
}

pub async fn create_item(
    state: web::Data<AppState>,
    payload: web::Json<CreateItemRequest>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;

    store_repo::find_by_id(&state.db, payload.store_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))?;

    let item =
        item_repo::create_item(&state.db, &payload.name, payload.price, payload.store_id).await?;

    Ok(HttpResponse::Created().json(item))
}

pub async fn list_items(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let items = item_repo::list(&state.db).await?;
    Ok(HttpResponse::Ok().json(items))
}

pub async fn get_item(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let item = item_repo::find_by_id(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(HttpResponse::Ok().json(item))
}

pub async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateItemRequest>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;

    let item = item_repo::update(&state.db, path.into_inner(), &payload.name, payload.price)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(HttpResponse::Ok().json(item))
}

pub async fn delete_item(
    state: web::Data<AppState>,
    ctx: AuthContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    if !ctx.is_admin {
        return Err(ApiError::AdminRequired);
    }

    let removed = item_repo::delete(&state.db, path.into_inner()).await?;

    if removed == 0 {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Item deleted.".to_string(),
    }))
}

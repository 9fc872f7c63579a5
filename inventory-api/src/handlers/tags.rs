/// Tag operations: per-store tags and item-tag links
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    db::{item_repo, store_repo, tag_repo},
    error::ApiError,
    models::{Item, Tag},
    AppState,
};

use super::auth::MessageResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TagAndItemResponse {
    pub message: String,
    pub item: Item,
    pub tag: Tag,
}

pub async fn list_tags_in_store(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let store_id = path.into_inner();

    store_repo::find_by_id(&state.db, store_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))?;

    let tags = tag_repo::list_for_store(&state.db, store_id).await?;
    Ok(HttpResponse::Ok().json(tags))
}

pub async fn create_tag_in_store(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<CreateTagRequest>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;
    let store_id = path.into_inner();

    store_repo::find_by_id(&state.db, store_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))?;

    let tag = tag_repo::create_tag(&state.db, &payload.name, store_id).await?;
    Ok(HttpResponse::Created().json(tag))
}

pub async fn get_tag(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let tag = tag_repo::find_by_id(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    Ok(HttpResponse::Ok().json(tag))
}

/// Delete a tag only when no item is linked to it.
pub async fn delete_tag(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let tag_id = path.into_inner();

    tag_repo::find_by_id(&state.db, tag_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    if tag_repo::linked_item_count(&state.db, tag_id).await? > 0 {
        return Err(ApiError::Conflict(
            "Could not delete tag. Make sure tag is not associated with any items".to_string(),
        ));
    }

    tag_repo::delete(&state.db, tag_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Tag deleted.".to_string(),
    }))
}

/// Link a tag to an item; both must belong to the same store.
pub async fn link_tag_to_item(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, ApiError> {
    let (item_id, tag_id) = path.into_inner();

    let item = item_repo::find_by_id(&state.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;
    let tag = tag_repo::find_by_id(&state.db, tag_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    if item.store_id != tag.store_id {
        return Err(ApiError::Validation(
            "You cannot assign a tag from a different store".to_string(),
        ));
    }

    tag_repo::link_item(&state.db, item_id, tag_id).await?;

    Ok(HttpResponse::Created().json(tag))
}

pub async fn unlink_tag_from_item(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, ApiError> {
    let (item_id, tag_id) = path.into_inner();

    let item = item_repo::find_by_id(&state.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;
    let tag = tag_repo::find_by_id(&state.db, tag_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    let removed = tag_repo::unlink_item(&state.db, item_id, tag_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(
            "Tag is not linked to that item".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(TagAndItemResponse {
        message: "Item removed from tag".to_string(),
        item,
        tag,
    }))
}

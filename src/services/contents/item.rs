use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{ContentService, check_upload, owned_module};
use crate::models::{
    ApiResponse, ErrorCode,
    contents::{
        entities::{ContentKind, Item},
        requests::ItemRequest,
    },
    users::entities::User,
};
use crate::services::{bad_request, current_user, internal_error, not_found};
use crate::storage::Storage;

/// 模块归属当前讲师且条目由其创建
async fn owned_item(
    storage: &Arc<dyn Storage>,
    user: &User,
    module_id: i64,
    kind: ContentKind,
    item_id: i64,
) -> Result<Item, HttpResponse> {
    owned_module(storage, user, module_id).await?;

    match storage.get_item(kind, item_id).await {
        Ok(Some(item)) if item.owner_id == user.id => Ok(item),
        Ok(_) => Err(not_found(ErrorCode::ContentNotFound, "Content not found")),
        Err(e) => Err(internal_error(
            ErrorCode::InternalServerError,
            "Failed to query content",
            e,
        )),
    }
}

pub async fn get_item(
    service: &ContentService,
    module_id: i64,
    model_name: Option<ContentKind>,
    item_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(kind) = model_name else {
        return Ok(not_found(
            ErrorCode::ContentTypeNotFound,
            "Unknown content type",
        ));
    };
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match owned_item(&storage, &user, module_id, kind, item_id).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            item,
            "Content retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}

pub async fn update_item(
    service: &ContentService,
    module_id: i64,
    model_name: Option<ContentKind>,
    item_id: i64,
    item_request: ItemRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(kind) = model_name else {
        return Ok(not_found(
            ErrorCode::ContentTypeNotFound,
            "Unknown content type",
        ));
    };
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    if let Err(response) = owned_item(&storage, &user, module_id, kind, item_id).await {
        return Ok(response);
    }

    let (title, body) = match item_request.into_body(kind) {
        Ok(parsed) => parsed,
        Err(msg) => return Ok(bad_request(ErrorCode::ContentInvalid, msg)),
    };
    if let Err(response) = check_upload(&storage, &user, &body).await {
        return Ok(response);
    }

    match storage.update_item(kind, item_id, title, body).await {
        Ok(Some(item)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            item,
            "Content updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ContentNotFound, "Content not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to update content",
            e,
        )),
    }
}

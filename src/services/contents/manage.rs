use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ContentService, check_upload, owned_module};
use crate::models::{
    ApiResponse, ErrorCode,
    contents::{entities::ContentKind, requests::ItemRequest},
    modules::responses::ModuleWithContents,
};
use crate::services::{bad_request, current_user, internal_error, not_found};

pub async fn list_module_contents(
    service: &ContentService,
    module_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let module = match owned_module(&storage, &user, module_id).await {
        Ok(module) => module,
        Err(response) => return Ok(response),
    };

    match storage.list_contents_by_module(module.id).await {
        Ok(contents) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ModuleWithContents { module, contents },
            "Contents retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve contents",
            e,
        )),
    }
}

/// 创建条目并追加到模块末尾
pub async fn create_content(
    service: &ContentService,
    module_id: i64,
    model_name: Option<ContentKind>,
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

    let module = match owned_module(&storage, &user, module_id).await {
        Ok(module) => module,
        Err(response) => return Ok(response),
    };

    let (title, body) = match item_request.into_body(kind) {
        Ok(parsed) => parsed,
        Err(msg) => return Ok(bad_request(ErrorCode::ContentInvalid, msg)),
    };
    if let Err(response) = check_upload(&storage, &user, &body).await {
        return Ok(response);
    }

    match storage.create_content(module.id, user.id, title, body).await {
        Ok(content) => Ok(HttpResponse::Created().json(ApiResponse::success(
            content,
            "Content created successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to create content",
            e,
        )),
    }
}

/// 先删除条目，再删除内容行
pub async fn delete_content(
    service: &ContentService,
    content_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_owned_content(user.id, content_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ContentNotFound, "Content not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to query content",
                e,
            ));
        }
    }

    match storage.delete_content(content_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Content deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ContentNotFound, "Content not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to delete content",
            e,
        )),
    }
}

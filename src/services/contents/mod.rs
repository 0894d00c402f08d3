//! 模块内容管理（讲师）
//!
//! 内容行通过 (content_type, object_id) 指向 texts / files / images / videos 中的条目。

pub mod item;
pub mod manage;
pub mod order;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    contents::{
        entities::{ContentKind, ItemBody},
        requests::ItemRequest,
    },
    modules::{entities::Module, requests::OrderRequest},
    users::entities::User,
};
use crate::services::{bad_request, internal_error, not_found};
use crate::storage::Storage;

pub struct ContentService {
    storage: Option<Arc<dyn Storage>>,
}

impl ContentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_module_contents(
        &self,
        module_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_module_contents(self, module_id, request).await
    }

    pub async fn create_content(
        &self,
        module_id: i64,
        model_name: Option<ContentKind>,
        item_request: ItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_content(self, module_id, model_name, item_request, request).await
    }

    pub async fn delete_content(
        &self,
        content_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_content(self, content_id, request).await
    }

    pub async fn get_item(
        &self,
        module_id: i64,
        model_name: Option<ContentKind>,
        item_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        item::get_item(self, module_id, model_name, item_id, request).await
    }

    pub async fn update_item(
        &self,
        module_id: i64,
        model_name: Option<ContentKind>,
        item_id: i64,
        item_request: ItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        item::update_item(self, module_id, model_name, item_id, item_request, request).await
    }

    pub async fn reorder_contents(
        &self,
        orders: OrderRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        order::reorder_contents(self, orders, request).await
    }
}

/// 当前讲师拥有的模块，否则返回 404
pub(super) async fn owned_module(
    storage: &Arc<dyn Storage>,
    user: &User,
    module_id: i64,
) -> Result<Module, HttpResponse> {
    match storage.get_owned_module(user.id, module_id).await {
        Ok(Some(module)) => Ok(module),
        Ok(None) => Err(not_found(ErrorCode::ModuleNotFound, "Module not found")),
        Err(e) => Err(internal_error(
            ErrorCode::InternalServerError,
            "Failed to query module",
            e,
        )),
    }
}

/// 文件 / 图片条目引用的上传必须存在且属于当前用户，图片条目只接受图片
pub(super) async fn check_upload(
    storage: &Arc<dyn Storage>,
    user: &User,
    body: &ItemBody,
) -> Result<(), HttpResponse> {
    let Some(token) = body.upload_token() else {
        return Ok(());
    };

    let upload = match storage.get_upload_by_token(token).await {
        Ok(Some(upload)) if upload.owner_id == user.id => upload,
        Ok(_) => {
            return Err(bad_request(
                ErrorCode::FileNotFound,
                "Referenced upload does not exist",
            ));
        }
        Err(e) => {
            return Err(internal_error(
                ErrorCode::InternalServerError,
                "Failed to query upload",
                e,
            ));
        }
    };

    if matches!(body, ItemBody::Image { .. }) && !upload.is_image() {
        return Err(bad_request(
            ErrorCode::FileTypeNotAllowed,
            "Image content requires an image upload",
        ));
    }
    Ok(())
}

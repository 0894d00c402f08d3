pub mod api;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod contents;
pub mod courses;
pub mod files;
pub mod students;
pub mod subjects;
pub mod users;
pub mod websocket;

pub use api::ApiService;
pub use auth::AuthService;
pub use catalog::CatalogService;
pub use chat::ChatService;
pub use contents::ContentService;
pub use courses::CourseService;
pub use files::FileService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use users::UserService;
pub use websocket::ChatRoomManager;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error, web};
use std::fmt::Display;
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::storage::Storage;

/// 取出注册在应用中的存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| error::ErrorInternalServerError("Storage not found in app data"))
}

pub(crate) fn cache_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone())
        .ok_or_else(|| error::ErrorInternalServerError("Cache not found in app data"))
}

/// 当前登录用户，未登录时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 记录错误并返回 500
pub(crate) fn internal_error(code: ErrorCode, context: &str, err: impl Display) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        code,
        format!("{context}: {err}"),
    ))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

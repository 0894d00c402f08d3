pub mod require_enrollment;
pub mod require_jwt;
pub mod require_role;

pub use require_enrollment::RequireEnrollment;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

use actix_web::{HttpResponse, http::StatusCode};

use crate::models::{ApiResponse, ErrorCode};

/// 中间件拦截请求时返回的统一错误响应
pub fn create_error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

//! 路径参数提取器
//!
//! 在进入处理函数前校验路径参数，失败时直接返回统一格式的 400。

use actix_web::{
    HttpRequest, HttpResponse, dev::Payload, error::InternalError, http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::contents::entities::ContentKind;
use crate::models::{ApiResponse, ErrorCode};

/// 构造参数错误
pub fn bad_path_param(name: &str, message: &str) -> actix_web::Error {
    let body = ApiResponse::error_empty(ErrorCode::BadRequest, format!("{name}: {message}"));
    InternalError::from_response(
        format!("invalid path parameter {name}"),
        HttpResponse::build(StatusCode::BAD_REQUEST).json(body),
    )
    .into()
}

/// 解析正整数 ID
pub fn parse_positive_i64(raw: Option<&str>) -> Result<i64, &'static str> {
    let raw = raw.ok_or("missing")?;
    match raw.parse::<i64>() {
        Ok(v) if v > 0 => Ok(v),
        Ok(_) => Err("must be a positive integer"),
        Err(_) => Err("must be an integer"),
    }
}

/// 定义从路径参数中提取正整数 ID 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready(
                    $crate::utils::extractor::parse_positive_i64(req.match_info().get($param))
                        .map($name)
                        .map_err(|msg| $crate::utils::extractor::bad_path_param($param, msg)),
                )
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeCourseIdI64, "course_id");
define_safe_i64_extractor!(SafeModuleIdI64, "module_id");
define_safe_i64_extractor!(SafeContentIdI64, "content_id");
define_safe_i64_extractor!(SafeItemIdI64, "item_id");

/// 内容类型路径参数（`text` / `file` / `image` / `video`）
///
/// 未知类型不在这里拒绝，由服务层返回 404。
#[derive(Debug, Clone)]
pub struct SafeModelName(pub Option<ContentKind>);

impl actix_web::FromRequest for SafeModelName {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let kind = req
            .match_info()
            .get("model_name")
            .and_then(|s| s.parse::<ContentKind>().ok());
        ready(Ok(SafeModelName(kind)))
    }
}

/// 上传文件 token
#[derive(Debug, Clone)]
pub struct SafeFileToken(pub String);

impl actix_web::FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("file_token") {
            Some(token) if is_valid_token(token) => Ok(SafeFileToken(token.to_string())),
            Some(_) => Err(bad_path_param("file_token", "invalid token format")),
            None => Err(bad_path_param("file_token", "missing")),
        };
        ready(result)
    }
}

/// 学科或课程的 slug
#[derive(Debug, Clone)]
pub struct SafeSlug(pub String);

impl actix_web::FromRequest for SafeSlug {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("slug") {
            Some(slug) => crate::utils::validate::validate_slug(slug)
                .map(|_| SafeSlug(slug.to_string()))
                .map_err(|msg| bad_path_param("slug", msg)),
            None => Err(bad_path_param("slug", "missing")),
        };
        ready(result)
    }
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= 64
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_i64() {
        assert_eq!(parse_positive_i64(Some("42")), Ok(42));
        assert!(parse_positive_i64(Some("0")).is_err());
        assert!(parse_positive_i64(Some("-3")).is_err());
        assert!(parse_positive_i64(Some("abc")).is_err());
        assert!(parse_positive_i64(None).is_err());
    }

    #[test]
    fn test_token_format() {
        assert!(is_valid_token("1735689600-0b0c8a52-5f7e-4c43-9d35-8c3a1f1e2b77"));
        assert!(!is_valid_token("../etc/passwd"));
        assert!(!is_valid_token(""));
    }
}

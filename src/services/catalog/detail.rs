use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::CatalogService;
use crate::middlewares::require_jwt::optional_user;
use crate::models::{ApiResponse, ErrorCode, courses::responses::CourseDetailResponse};
use crate::services::{internal_error, not_found};

/// 课程详情；请求带有效 token 时附带是否已选课
pub async fn course_detail(
    service: &CatalogService,
    course_slug: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = match storage.get_course_by_slug(&course_slug).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to retrieve course",
                e,
            ));
        }
    };

    let modules = match storage.list_modules_by_course(course.id).await {
        Ok(modules) => modules,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to retrieve modules",
                e,
            ));
        }
    };

    // 以下信息缺失时不影响页面
    let subject = storage
        .get_subject_by_id(course.subject_id)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to load subject {}: {}", course.subject_id, e);
            None
        });
    let owner = storage
        .get_user_by_id(course.owner_id)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to load owner {}: {}", course.owner_id, e);
            None
        })
        .map(|u| u.username);

    let enrolled = match optional_user(request).await {
        Some(user) => storage.is_enrolled(course.id, user.id).await.unwrap_or(false),
        None => false,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetailResponse {
            course,
            subject,
            owner,
            modules,
            enrolled,
        },
        "Course retrieved successfully",
    )))
}

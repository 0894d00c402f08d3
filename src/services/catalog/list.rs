use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ALL_COURSES_KEY, ALL_SUBJECTS_KEY, CatalogService, cached_or_load, subject_courses_key};
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode, courses::responses::CatalogResponse};
use crate::services::{internal_error, not_found};

/// 公开课程目录，可按学科 slug 过滤
pub async fn list_courses(
    service: &CatalogService,
    subject_slug: Option<String>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let cache = service.get_cache(request)?;
    let ttl = AppConfig::get().cache.default_ttl;

    let subjects = match cached_or_load(cache.as_ref(), ALL_SUBJECTS_KEY, ttl, || {
        storage.list_subjects_with_counts()
    })
    .await
    {
        Ok(subjects) => subjects,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to retrieve subjects",
                e,
            ));
        }
    };

    let subject = match subject_slug {
        Some(slug) => match storage.get_subject_by_slug(&slug).await {
            Ok(Some(subject)) => Some(subject),
            Ok(None) => return Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve subject",
                    e,
                ));
            }
        },
        None => None,
    };

    let (key, subject_id) = match &subject {
        Some(subject) => (subject_courses_key(subject.id), Some(subject.id)),
        None => (ALL_COURSES_KEY.to_string(), None),
    };

    let courses = match cached_or_load(cache.as_ref(), &key, ttl, || {
        storage.list_course_summaries(subject_id)
    })
    .await
    {
        Ok(courses) => courses,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to retrieve courses",
                e,
            ));
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CatalogResponse {
            subjects,
            subject,
            courses,
        },
        "Course catalog retrieved successfully",
    )))
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SUBJECT_TITLE_MAX_LEN, SubjectService};
use crate::models::{
    ApiResponse, ErrorCode,
    subjects::requests::{CreateSubjectRequest, UpdateSubjectRequest},
};
use crate::services::{bad_request, internal_error, not_found};
use crate::utils::validate::{validate_slug, validate_title};

fn subject_conflict() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::SubjectAlreadyExists,
        "Subject slug already exists",
    ))
}

pub async fn create_subject(
    service: &SubjectService,
    mut create_request: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    create_request.title = create_request.title.trim().to_string();
    create_request.slug = create_request.slug.trim().to_string();

    if let Err(msg) = validate_title(&create_request.title, SUBJECT_TITLE_MAX_LEN) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_slug(&create_request.slug) {
        return Ok(bad_request(ErrorCode::SubjectSlugInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    match storage.create_subject(create_request).await {
        Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(
            subject,
            "Subject created successfully",
        ))),
        Err(e) if e.is_conflict() => Ok(subject_conflict()),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to create subject",
            e,
        )),
    }
}

pub async fn update_subject(
    service: &SubjectService,
    subject_id: i64,
    mut update_request: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(title) = update_request.title.as_mut() {
        *title = title.trim().to_string();
        if let Err(msg) = validate_title(title, SUBJECT_TITLE_MAX_LEN) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }
    if let Some(slug) = update_request.slug.as_mut() {
        *slug = slug.trim().to_string();
        if let Err(msg) = validate_slug(slug) {
            return Ok(bad_request(ErrorCode::SubjectSlugInvalid, msg));
        }
    }

    let storage = service.get_storage(request)?;

    match storage.update_subject(subject_id, update_request).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) if e.is_conflict() => Ok(subject_conflict()),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to update subject",
            e,
        )),
    }
}

/// 删除学科会级联删除其课程，课程有聊天记录时被拒绝
pub async fn delete_subject(
    service: &SubjectService,
    subject_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_subject(subject_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Subject deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) if e.is_reference_protected() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseHasMessages,
                "Courses of this subject have chat messages and cannot be deleted",
            )))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to delete subject",
            e,
        )),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{COURSE_TITLE_MAX_LEN, CourseService};
use crate::models::{
    ApiResponse, ErrorCode, PaginationQuery,
    courses::requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
};
use crate::services::{bad_request, current_user, internal_error, not_found};
use crate::storage::Storage;
use crate::utils::validate::{validate_slug, validate_title};

fn course_conflict() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::CourseAlreadyExists,
        "Course slug already exists",
    ))
}

/// 所选学科必须存在，否则返回 400
async fn check_subject(storage: &Arc<dyn Storage>, subject_id: i64) -> Result<(), HttpResponse> {
    match storage.get_subject_by_id(subject_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(bad_request(
            ErrorCode::SubjectNotFound,
            format!("Subject {subject_id} does not exist"),
        )),
        Err(e) => Err(internal_error(
            ErrorCode::InternalServerError,
            "Failed to query subject",
            e,
        )),
    }
}

pub async fn list_own_courses(
    service: &CourseService,
    query: PaginationQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let list_query = CourseListQuery {
        pagination: query,
        owner_id: Some(user.id),
        ..Default::default()
    };

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve course list",
            e,
        )),
    }
}

pub async fn create_course(
    service: &CourseService,
    mut create_request: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    create_request.title = create_request.title.trim().to_string();
    create_request.slug = create_request.slug.trim().to_string();

    if let Err(msg) = validate_title(&create_request.title, COURSE_TITLE_MAX_LEN) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_slug(&create_request.slug) {
        return Ok(bad_request(ErrorCode::CourseSlugInvalid, msg));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = check_subject(&storage, create_request.subject_id).await {
        return Ok(response);
    }

    match storage.create_course(user.id, create_request).await {
        Ok(course) => {
            tracing::info!("Instructor {} created course {}", user.id, course.slug);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                course,
                "Course created successfully",
            )))
        }
        Err(e) if e.is_conflict() => Ok(course_conflict()),
        Err(e) => Ok(internal_error(
            ErrorCode::CourseCreationFailed,
            "Failed to create course",
            e,
        )),
    }
}

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    mut update_request: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Some(title) = update_request.title.as_mut() {
        *title = title.trim().to_string();
        if let Err(msg) = validate_title(title, COURSE_TITLE_MAX_LEN) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }
    if let Some(slug) = update_request.slug.as_mut() {
        *slug = slug.trim().to_string();
        if let Err(msg) = validate_slug(slug) {
            return Ok(bad_request(ErrorCode::CourseSlugInvalid, msg));
        }
    }

    let storage = service.get_storage(request)?;

    match storage.get_owned_course(user.id, course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to query course",
                e,
            ));
        }
    }

    if let Some(subject_id) = update_request.subject_id
        && let Err(response) = check_subject(&storage, subject_id).await
    {
        return Ok(response);
    }

    match storage.update_course(course_id, update_request).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) if e.is_conflict() => Ok(course_conflict()),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to update course",
            e,
        )),
    }
}

/// 级联删除模块与选课记录；课程有聊天记录时返回 409
pub async fn delete_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_owned_course(user.id, course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to query course",
                e,
            ));
        }
    }

    match storage.delete_course(course_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Course deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) if e.is_reference_protected() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseHasMessages,
                "Course has chat messages and cannot be deleted",
            )))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to delete course",
            e,
        )),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::ApiService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode, PaginatedResponse,
    courses::{
        entities::Course,
        requests::{CourseListParams, CourseListQuery},
        responses::{
            ApiContent, ApiCourse, ApiCourseWithContents, ApiModuleWithContents, EnrollResult,
        },
    },
};
use crate::services::{current_user, internal_error, not_found};
use crate::storage::Storage;

async fn load_course(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> std::result::Result<Course, HttpResponse> {
    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => Ok(course),
        Ok(None) => Err(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Err(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve course",
            e,
        )),
    }
}

async fn with_modules(storage: &Arc<dyn Storage>, course: Course) -> Result<ApiCourse> {
    let modules = storage.list_modules_by_course(course.id).await?;
    Ok(ApiCourse::new(course, modules))
}

pub async fn list_courses(
    service: &ApiService,
    params: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let query = CourseListQuery {
        pagination: params.pagination,
        subject_id: params.subject_id,
        ..Default::default()
    };

    let page = match storage.list_courses_with_pagination(query).await {
        Ok(page) => page,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to retrieve course list",
                e,
            ));
        }
    };

    let mut items = Vec::with_capacity(page.items.len());
    for course in page.items {
        match with_modules(&storage, course).await {
            Ok(course) => items.push(course),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve modules",
                    e,
                ));
            }
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PaginatedResponse {
            items,
            pagination: page.pagination,
        },
        "Course list retrieved successfully",
    )))
}

pub async fn get_course(
    service: &ApiService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    match with_modules(&storage, course).await {
        Ok(course) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve modules",
            e,
        )),
    }
}

/// 选课，已选时同样返回 `enrolled: true`
pub async fn enroll(
    service: &ApiService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    match storage.enroll_student(course.id, user.id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollResult { enrolled: true },
            "Enrolled successfully",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::EnrollFailed, "Failed to enroll", e)),
    }
}

/// 课程全部模块及渲染后的内容，选课检查由中间件完成
pub async fn course_contents(
    service: &ApiService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    match load_modules_with_contents(&storage, course.id).await {
        Ok(modules) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ApiCourseWithContents {
                id: course.id,
                subject: course.subject_id,
                title: course.title,
                slug: course.slug,
                overview: course.overview,
                created: course.created_at,
                owner: course.owner_id,
                modules,
            },
            "Course contents retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve course contents",
            e,
        )),
    }
}

async fn load_modules_with_contents(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> Result<Vec<ApiModuleWithContents>> {
    let modules = storage.list_modules_by_course(course_id).await?;
    let mut result = Vec::with_capacity(modules.len());
    for module in modules {
        let contents = storage.list_contents_by_module(module.id).await?;
        result.push(ApiModuleWithContents {
            order: module.order,
            title: module.title,
            description: module.description,
            contents: contents
                .iter()
                .map(|c| ApiContent {
                    order: c.order,
                    item: c.render(),
                })
                .collect(),
        });
    }
    Ok(result)
}

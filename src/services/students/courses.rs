use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{STUDENT_COURSE_CACHE_TTL, StudentService};
use crate::cache::{CacheResult, get_json, insert_json};
use crate::models::{
    ApiResponse, ErrorCode, PaginationQuery,
    contents::responses::RenderedContent,
    courses::requests::CourseListQuery,
    modules::entities::Module,
    students::responses::{StudentCourseDetail, StudentModule},
};
use crate::services::{current_user, internal_error, not_found};

fn course_cache_key(user_id: i64, course_id: i64, module_id: Option<i64>) -> String {
    match module_id {
        Some(module_id) => format!("student_{user_id}_{course_id}_{module_id}"),
        None => format!("student_{user_id}_{course_id}"),
    }
}

/// 选中请求的模块；不属于该课程或未指定时取第一个
fn select_module(modules: &[Module], requested: Option<i64>) -> Option<&Module> {
    requested
        .and_then(|id| modules.iter().find(|m| m.id == id))
        .or_else(|| modules.first())
}

pub async fn list_enrolled_courses(
    service: &StudentService,
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
        student_id: Some(user.id),
        ..Default::default()
    };

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrolled courses retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve enrolled courses",
            e,
        )),
    }
}

/// 学习页：课程、模块列表和选中模块的渲染内容
///
/// 选课检查由路由上的中间件完成。
pub async fn course_detail(
    service: &StudentService,
    course_id: i64,
    module_id: Option<i64>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;
    let cache = service.get_cache(request)?;

    let key = course_cache_key(user.id, course_id, module_id);
    if let CacheResult::Found(detail) = get_json::<StudentCourseDetail>(cache.as_ref(), &key).await
    {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Course retrieved successfully",
        )));
    }

    let course = match storage.get_course_by_id(course_id).await {
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

    let module = match select_module(&modules, module_id) {
        Some(module) => match storage.list_contents_by_module(module.id).await {
            Ok(contents) => Some(StudentModule {
                module: module.clone(),
                contents: contents.iter().map(RenderedContent::from).collect(),
            }),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve module contents",
                    e,
                ));
            }
        },
        None => None,
    };

    let detail = StudentCourseDetail {
        course,
        modules,
        module,
    };
    insert_json(cache.as_ref(), &key, &detail, STUDENT_COURSE_CACHE_TTL).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Course retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: i64, order: i32) -> Module {
        Module {
            id,
            course_id: 1,
            title: format!("Module {id}"),
            description: String::new(),
            order,
        }
    }

    #[test]
    fn test_requested_module_is_selected() {
        let modules = vec![module(10, 0), module(11, 1)];
        assert_eq!(select_module(&modules, Some(11)).map(|m| m.id), Some(11));
    }

    #[test]
    fn test_foreign_or_missing_module_falls_back_to_first() {
        let modules = vec![module(10, 0), module(11, 1)];
        assert_eq!(select_module(&modules, Some(99)).map(|m| m.id), Some(10));
        assert_eq!(select_module(&modules, None).map(|m| m.id), Some(10));
        assert!(select_module(&[], Some(10)).is_none());
    }

    #[test]
    fn test_cache_key_per_user_course_module() {
        assert_eq!(course_cache_key(3, 7, Some(2)), "student_3_7_2");
        assert_eq!(course_cache_key(3, 7, None), "student_3_7");
        assert_ne!(course_cache_key(4, 7, Some(2)), course_cache_key(3, 7, Some(2)));
    }
}

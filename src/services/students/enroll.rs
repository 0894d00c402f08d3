use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::EnrollRequest, responses::EnrollResponse},
};
use crate::services::{current_user, internal_error, not_found};

/// 选课，重复选课不报错
pub async fn enroll(
    service: &StudentService,
    enroll_request: EnrollRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let course = match storage.get_course_by_id(enroll_request.course_id).await {
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

    match storage.enroll_student(course.id, user.id).await {
        Ok(created) => {
            if created {
                info!("User {} enrolled in course {}", user.id, course.id);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                EnrollResponse {
                    course_id: course.id,
                    created,
                },
                "Enrolled successfully",
            )))
        }
        Err(e) => Ok(internal_error(ErrorCode::EnrollFailed, "Failed to enroll", e)),
    }
}

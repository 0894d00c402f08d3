use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ErrorCode;
use crate::models::courses::requests::CourseListParams;
use crate::services::ApiService;
use crate::utils::SafeCourseIdI64;

// 懒加载的全局 ApiService 实例
static API_SERVICE: Lazy<ApiService> = Lazy::new(ApiService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    API_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    API_SERVICE.get_course(course_id.0, &req).await
}

pub async fn enroll(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    API_SERVICE.enroll(course_id.0, &req).await
}

pub async fn course_contents(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    API_SERVICE.course_contents(course_id.0, &req).await
}

// 配置路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .route("", web::get().to(list_courses))
            .route("/{course_id}", web::get().to(get_course))
            .service(
                web::resource("/{course_id}/enroll")
                    .wrap(middlewares::RequireJWT)
                    .route(web::post().to(enroll)),
            )
            .service(
                web::resource("/{course_id}/contents")
                    .wrap(middlewares::RequireEnrollment::forbidden(
                        ErrorCode::NotEnrolled,
                    ))
                    .wrap(middlewares::RequireJWT)
                    .route(web::get().to(course_contents)),
            ),
    );
}

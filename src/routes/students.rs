use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::students::requests::EnrollRequest;
use crate::services::StudentService;
use crate::utils::{SafeCourseIdI64, SafeModuleIdI64};

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn enroll(
    req: HttpRequest,
    enroll_data: web::Json<EnrollRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.enroll(enroll_data.into_inner(), &req).await
}

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .list_enrolled_courses(query.into_inner(), &req)
        .await
}

pub async fn course_detail(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.course_detail(course_id.0, None, &req).await
}

pub async fn module_detail(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    module_id: SafeModuleIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .course_detail(course_id.0, Some(module_id.0), &req)
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .route("/enroll", web::post().to(enroll))
            .route("/courses", web::get().to(list_courses))
            .service(
                web::resource("/courses/{course_id}")
                    .wrap(middlewares::RequireEnrollment::hidden())
                    .route(web::get().to(course_detail)),
            )
            .service(
                web::resource("/courses/{course_id}/modules/{module_id}")
                    .wrap(middlewares::RequireEnrollment::hidden())
                    .route(web::get().to(module_detail)),
            ),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::CatalogService;
use crate::utils::SafeSlug;

// 懒加载的全局 CatalogService 实例
static CATALOG_SERVICE: Lazy<CatalogService> = Lazy::new(CatalogService::new_lazy);

pub async fn list_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_courses(None, &req).await
}

pub async fn list_subject_courses(
    req: HttpRequest,
    subject_slug: SafeSlug,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .list_courses(Some(subject_slug.0), &req)
        .await
}

pub async fn course_detail(req: HttpRequest, course_slug: SafeSlug) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.course_detail(course_slug.0, &req).await
}

// 配置路由
pub fn configure_catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/catalog")
            .route("/courses", web::get().to(list_courses))
            .route("/courses/{slug}", web::get().to(course_detail))
            .route(
                "/subject/{slug}/courses",
                web::get().to(list_subject_courses),
            ),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::contents::requests::ItemRequest;
use crate::models::courses::requests::{CreateCourseRequest, UpdateCourseRequest};
use crate::models::modules::requests::{ModuleFormEntry, OrderRequest};
use crate::models::users::entities::UserRole;
use crate::services::{ContentService, CourseService};
use crate::utils::{
    SafeContentIdI64, SafeCourseIdI64, SafeItemIdI64, SafeModelName, SafeModuleIdI64,
};

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static CONTENT_SERVICE: Lazy<ContentService> = Lazy::new(ContentService::new_lazy);

// ==================== 课程 ====================

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .list_own_courses(query.into_inner(), &req)
        .await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(course_data.into_inner(), &req)
        .await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(course_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(course_id.0, &req).await
}

// ==================== 模块 ====================

pub async fn get_module_formset(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_module_formset(course_id.0, &req).await
}

pub async fn save_module_formset(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    forms: web::Json<Vec<ModuleFormEntry>>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .save_module_formset(course_id.0, forms.into_inner(), &req)
        .await
}

pub async fn reorder_modules(
    req: HttpRequest,
    orders: web::Json<OrderRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .reorder_modules(orders.into_inner(), &req)
        .await
}

// ==================== 内容 ====================

pub async fn list_module_contents(
    req: HttpRequest,
    module_id: SafeModuleIdI64,
) -> ActixResult<HttpResponse> {
    CONTENT_SERVICE
        .list_module_contents(module_id.0, &req)
        .await
}

pub async fn create_content(
    req: HttpRequest,
    module_id: SafeModuleIdI64,
    model_name: SafeModelName,
    item_data: web::Json<ItemRequest>,
) -> ActixResult<HttpResponse> {
    CONTENT_SERVICE
        .create_content(module_id.0, model_name.0, item_data.into_inner(), &req)
        .await
}

pub async fn get_item(
    req: HttpRequest,
    module_id: SafeModuleIdI64,
    model_name: SafeModelName,
    item_id: SafeItemIdI64,
) -> ActixResult<HttpResponse> {
    CONTENT_SERVICE
        .get_item(module_id.0, model_name.0, item_id.0, &req)
        .await
}

pub async fn update_item(
    req: HttpRequest,
    module_id: SafeModuleIdI64,
    model_name: SafeModelName,
    item_id: SafeItemIdI64,
    item_data: web::Json<ItemRequest>,
) -> ActixResult<HttpResponse> {
    CONTENT_SERVICE
        .update_item(
            module_id.0,
            model_name.0,
            item_id.0,
            item_data.into_inner(),
            &req,
        )
        .await
}

pub async fn delete_content(
    req: HttpRequest,
    content_id: SafeContentIdI64,
) -> ActixResult<HttpResponse> {
    CONTENT_SERVICE.delete_content(content_id.0, &req).await
}

pub async fn reorder_contents(
    req: HttpRequest,
    orders: web::Json<OrderRequest>,
) -> ActixResult<HttpResponse> {
    CONTENT_SERVICE
        .reorder_contents(orders.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_manage_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/manage")
            .wrap(middlewares::RequireRole::new_any(
                UserRole::instructor_roles(),
            ))
            .wrap(middlewares::RequireJWT)
            .route("/courses", web::get().to(list_courses))
            .route("/courses", web::post().to(create_course))
            .route("/courses/{course_id}", web::put().to(update_course))
            .route("/courses/{course_id}", web::delete().to(delete_course))
            .route(
                "/courses/{course_id}/modules",
                web::get().to(get_module_formset),
            )
            .route(
                "/courses/{course_id}/modules",
                web::put().to(save_module_formset),
            )
            // 固定路径先于带参数的路径注册
            .route("/modules/order", web::post().to(reorder_modules))
            .route(
                "/modules/{module_id}/contents",
                web::get().to(list_module_contents),
            )
            .route(
                "/modules/{module_id}/contents/{model_name}",
                web::post().to(create_content),
            )
            .route(
                "/modules/{module_id}/contents/{model_name}/{item_id}",
                web::get().to(get_item),
            )
            .route(
                "/modules/{module_id}/contents/{model_name}/{item_id}",
                web::put().to(update_item),
            )
            .route("/contents/order", web::post().to(reorder_contents))
            .route("/contents/{content_id}", web::delete().to(delete_content)),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ErrorCode;
use crate::models::chat::requests::{ChatMessageListParams, ChatSocketParams};
use crate::models::users::entities::UserRole;
use crate::services::ChatService;
use crate::utils::SafeCourseIdI64;

// 懒加载的全局 ChatService 实例
static CHAT_SERVICE: Lazy<ChatService> = Lazy::new(ChatService::new_lazy);

pub async fn chat_room(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.chat_room(course_id.0, &req).await
}

pub async fn list_messages(
    req: HttpRequest,
    query: web::Query<ChatMessageListParams>,
) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.list_messages(query.into_inner(), &req).await
}

pub async fn connect(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    query: web::Query<ChatSocketParams>,
    stream: web::Payload,
) -> ActixResult<HttpResponse> {
    CHAT_SERVICE
        .connect(course_id.0, query.into_inner(), &req, stream)
        .await
}

// 配置路由
pub fn configure_chat_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/chat")
            .service(
                web::resource("/room/{course_id}")
                    .wrap(middlewares::RequireEnrollment::forbidden(
                        ErrorCode::ChatAccessDenied,
                    ))
                    .wrap(middlewares::RequireJWT)
                    .route(web::get().to(chat_room)),
            )
            .service(
                web::resource("/messages")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route(web::get().to(list_messages)),
            ),
    );
    // 握手由处理函数自行鉴权
    cfg.service(
        web::scope("/ws/chat").route("/room/{course_id}", web::get().to(connect)),
    );
}

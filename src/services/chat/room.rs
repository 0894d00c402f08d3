use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{error, info};

use super::ChatService;
use crate::config::AppConfig;
use crate::middlewares::require_jwt::resolve_user_from_token;
use crate::models::{
    ApiResponse, ErrorCode,
    chat::{requests::ChatSocketParams, responses::ChatRoomResponse},
};
use crate::services::websocket::ChatRoomManager;
use crate::services::{internal_error, not_found};

/// 聊天室页面：课程与最近的消息，选课检查由中间件完成
pub async fn chat_room(
    service: &ChatService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

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

    let history_size = AppConfig::get().chat.history_size;
    match storage.list_recent_messages(course.id, history_size).await {
        Ok(messages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ChatRoomResponse { course, messages },
            "Chat room retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve chat history",
            e,
        )),
    }
}

/// WebSocket 握手：浏览器无法设置请求头，token 通过查询参数传递
pub async fn connect(
    service: &ChatService,
    course_id: i64,
    params: ChatSocketParams,
    request: &HttpRequest,
    stream: web::Payload,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let cache = service.get_cache(request)?;

    let user = match resolve_user_from_token(&params.token, &storage, &cache).await {
        Ok(user) => user,
        Err(msg) => {
            info!("Chat connection refused: {}", msg);
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, msg)));
        }
    };

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to retrieve course",
                e,
            ));
        }
    }

    let allowed = if user.is_admin() {
        true
    } else {
        match storage.is_enrolled(course_id, user.id).await {
            Ok(enrolled) => enrolled,
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to check enrollment",
                    e,
                ));
            }
        }
    };
    if !allowed {
        info!("User {} refused from chat of course {}", user.id, course_id);
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ChatAccessDenied,
            "You are not enrolled in this course",
        )));
    }

    let Some(manager) = request.app_data::<web::Data<ChatRoomManager>>() else {
        error!("ChatRoomManager not found in app data");
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Chat is not available",
        )));
    };
    let manager = manager.clone().into_inner();

    let (response, session, msg_stream) = actix_ws::handle(request, stream)?;
    let heartbeat = AppConfig::get().chat_heartbeat_interval();

    actix_web::rt::spawn(manager.run_session(
        storage,
        user,
        course_id,
        heartbeat,
        session,
        msg_stream,
    ));

    Ok(response)
}
